use lazyitems_core_types::ElementLocation;
use thiserror::Error;

/// Result type alias using ItemEvalError
pub type Result<T> = std::result::Result<T, ItemEvalError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on when they
/// surface evaluation failures as project-definition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Project definition
    InvalidSpecification,
    UnsupportedExpression,
    InvalidGlob,

    // Collaborator contract
    MissingArgument,

    // Configuration
    InvalidConfiguration,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSpecification => "ERR_INVALID_SPECIFICATION",
            ExErrorKind::UnsupportedExpression => "ERR_UNSUPPORTED_EXPRESSION",
            ExErrorKind::InvalidGlob => "ERR_INVALID_GLOB",
            ExErrorKind::MissingArgument => "ERR_MISSING_ARGUMENT",
            ExErrorKind::InvalidConfiguration => "ERR_INVALID_CONFIGURATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever context was known when the
/// error crossed an operation boundary.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    item_type: Option<String>,
    location: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            item_type: None,
            location: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add item type context
    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Add source location context
    pub fn with_location(mut self, location: &ElementLocation) -> Self {
        self.location = Some(location.location_string());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the item type context, if any
    pub fn item_type(&self) -> Option<&str> {
        self.item_type.as_deref()
    }

    /// Get the rendered source location, if any
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(item_type) = &self.item_type {
            write!(f, " (item_type: {})", item_type)?;
        }
        if let Some(location) = &self.location {
            write!(f, " (at: {})", location)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for item evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemEvalError {
    // ===== Specification Errors =====
    /// Match-on-metadata needs exactly one metadata name and an item spec
    /// made of a single item list reference
    #[error("Only one item type may be referenced when removing with MatchOnMetadata, and only one metadata name may be matched ({item_type} at {location})")]
    MatchOnMetadataRestricted {
        item_type: String,
        location: ElementLocation,
    },

    /// Declaration attribute not supported by this operation kind
    #[error("Attribute '{attribute}' is not valid on {operation} operations ({item_type} at {location})")]
    AttributeNotAllowed {
        attribute: String,
        operation: String,
        item_type: String,
        location: ElementLocation,
    },

    /// Item expression other than a bare `@(Type)` reference
    #[error("Unsupported item expression '{expression}' at {location}")]
    UnsupportedItemExpression {
        expression: String,
        location: ElementLocation,
    },

    /// Glob fragment failed to compile
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    // ===== Contract Errors =====
    /// Required input absent or empty
    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    /// A frozen reference points past the operations declared for its type
    #[error("Reference to {item_type} at operation {op_count} exceeds the {available} declared operations")]
    ReferenceOutOfRange {
        item_type: String,
        op_count: usize,
        available: usize,
    },

    // ===== Configuration Errors =====
    /// Unknown metadata comparison mode name
    #[error("Invalid metadata comparison mode: {value}")]
    InvalidComparisonMode { value: String },

    /// Options document could not be parsed
    #[error("Invalid evaluation options: {message}")]
    InvalidOptions { message: String },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ItemEvalError {
    /// Whether the caller should surface this as a project definition error
    pub fn is_invalid_specification(&self) -> bool {
        matches!(
            self,
            ItemEvalError::MatchOnMetadataRestricted { .. }
                | ItemEvalError::AttributeNotAllowed { .. }
        )
    }

    /// Source location of the offending declaration, when known
    pub fn location(&self) -> Option<&ElementLocation> {
        match self {
            ItemEvalError::MatchOnMetadataRestricted { location, .. }
            | ItemEvalError::AttributeNotAllowed { location, .. }
            | ItemEvalError::UnsupportedItemExpression { location, .. } => Some(location),
            _ => None,
        }
    }

    pub(crate) fn missing(argument: &str) -> Self {
        ItemEvalError::MissingArgument {
            argument: argument.to_string(),
        }
    }
}

/// Conversion from ItemEvalError to ExError
impl From<ItemEvalError> for ExError {
    fn from(err: ItemEvalError) -> Self {
        let message = err.to_string();
        match err {
            ItemEvalError::MatchOnMetadataRestricted {
                item_type,
                location,
            } => ExError::new(ExErrorKind::InvalidSpecification)
                .with_item_type(item_type)
                .with_location(&location)
                .with_message(message),
            ItemEvalError::AttributeNotAllowed {
                operation,
                item_type,
                location,
                ..
            } => ExError::new(ExErrorKind::InvalidSpecification)
                .with_op(operation)
                .with_item_type(item_type)
                .with_location(&location)
                .with_message(message),
            ItemEvalError::UnsupportedItemExpression { location, .. } => {
                ExError::new(ExErrorKind::UnsupportedExpression)
                    .with_location(&location)
                    .with_message(message)
            }
            ItemEvalError::InvalidGlob { .. } => {
                ExError::new(ExErrorKind::InvalidGlob).with_message(message)
            }
            ItemEvalError::MissingArgument { .. } => {
                ExError::new(ExErrorKind::MissingArgument).with_message(message)
            }
            ItemEvalError::ReferenceOutOfRange { item_type, .. } => {
                ExError::new(ExErrorKind::Internal)
                    .with_item_type(item_type)
                    .with_message(message)
            }
            ItemEvalError::InvalidComparisonMode { .. } | ItemEvalError::InvalidOptions { .. } => {
                ExError::new(ExErrorKind::InvalidConfiguration).with_message(message)
            }
            ItemEvalError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<toml::de::Error> for ItemEvalError {
    fn from(err: toml::de::Error) -> Self {
        ItemEvalError::InvalidOptions {
            message: err.to_string(),
        }
    }
}
