use std::sync::Arc;

use super::metadata::Metadata;

/// Well-known metadata name that resolves to the item value
pub const IDENTITY_METADATA: &str = "Identity";

/// Capabilities the matcher needs from an item
///
/// Matching only looks at the value string and at metadata lookups, so any
/// host item representation can be matched against an `ItemSpec`.
pub trait Item {
    /// The value string that identifies the item for matching
    fn value(&self) -> &str;

    /// Value of a metadata entry, if present
    fn metadata_value(&self, name: &str) -> Option<&str>;
}

/// Item produced by evaluation
///
/// Immutable once created. Operations that change metadata build a new
/// `ProjectItem`, so snapshots holding the old one are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    item_type: Arc<str>,
    value: Arc<str>,
    metadata: Metadata,
}

impl ProjectItem {
    /// Create an item with no metadata
    pub fn new(item_type: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        Self {
            item_type: item_type.into(),
            value: value.into(),
            metadata: Metadata::new(),
        }
    }

    /// Replace the metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Copy of this item with `updates` merged over its metadata
    pub fn with_merged_metadata(&self, updates: &Metadata) -> Self {
        Self {
            item_type: self.item_type.clone(),
            value: self.value.clone(),
            metadata: self.metadata.merged(updates),
        }
    }

    /// Item type this item belongs to
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Shared handle to the value string
    pub fn value_arc(&self) -> &Arc<str> {
        &self.value
    }

    /// Declared metadata (without well-known entries)
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Item for ProjectItem {
    fn value(&self) -> &str {
        &self.value
    }

    fn metadata_value(&self, name: &str) -> Option<&str> {
        match self.metadata.get(name) {
            Some(value) => Some(value),
            None if name == IDENTITY_METADATA => Some(&*self.value),
            None => None,
        }
    }
}
