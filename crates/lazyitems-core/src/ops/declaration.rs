use std::fmt;

use lazyitems_core_types::ElementLocation;

use crate::match_on_metadata::MetadataComparisonMode;
use crate::model::Metadata;

/// Kind of item mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Include,
    Exclude,
    Remove,
    Update,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Include => "Include",
            OperationType::Exclude => "Exclude",
            OperationType::Remove => "Remove",
            OperationType::Update => "Update",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One item element as handed over by the project parser
///
/// Properties are already expanded and the condition already evaluated.
///
/// ```
/// use lazyitems_core::ops::OperationDeclaration;
/// use lazyitems_core::MetadataComparisonMode;
///
/// let remove = OperationDeclaration::remove("Compile", "@(Generated)")
///     .match_on_metadata(["Link"], MetadataComparisonMode::PathLike)
///     .with_condition(true);
/// assert_eq!(remove.match_on_metadata.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct OperationDeclaration {
    pub kind: OperationType,
    pub item_type: String,
    pub item_spec: String,
    pub condition: bool,
    pub location: ElementLocation,
    /// `Exclude` attribute of an Include
    pub exclude: Option<String>,
    /// Metadata declared on an Include or Update
    pub metadata: Metadata,
    /// `MatchOnMetadata` names of a Remove
    pub match_on_metadata: Vec<String>,
    pub comparison_mode: MetadataComparisonMode,
}

impl OperationDeclaration {
    pub fn new(kind: OperationType, item_type: impl Into<String>, item_spec: impl Into<String>) -> Self {
        Self {
            kind,
            item_type: item_type.into(),
            item_spec: item_spec.into(),
            condition: true,
            location: ElementLocation::default(),
            exclude: None,
            metadata: Metadata::new(),
            match_on_metadata: Vec::new(),
            comparison_mode: MetadataComparisonMode::default(),
        }
    }

    pub fn include(item_type: impl Into<String>, item_spec: impl Into<String>) -> Self {
        Self::new(OperationType::Include, item_type, item_spec)
    }

    pub fn exclude(item_type: impl Into<String>, item_spec: impl Into<String>) -> Self {
        Self::new(OperationType::Exclude, item_type, item_spec)
    }

    pub fn remove(item_type: impl Into<String>, item_spec: impl Into<String>) -> Self {
        Self::new(OperationType::Remove, item_type, item_spec)
    }

    pub fn update(item_type: impl Into<String>, item_spec: impl Into<String>) -> Self {
        Self::new(OperationType::Update, item_type, item_spec)
    }

    pub fn with_condition(mut self, condition: bool) -> Self {
        self.condition = condition;
        self
    }

    pub fn at(mut self, location: ElementLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: &str) -> Self {
        self.metadata.set(name, value);
        self
    }

    pub fn match_on_metadata<N, S>(mut self, names: N, mode: MetadataComparisonMode) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.match_on_metadata = names.into_iter().map(Into::into).collect();
        self.comparison_mode = mode;
        self
    }
}
