use std::collections::HashSet;
use std::sync::Arc;

use super::fragment::Fragment;
use super::item_spec::ItemSpec;
use crate::errors::{ItemEvalError, Result};
use crate::list::ItemList;
use crate::match_on_metadata::{MatchOnMetadataState, MetadataIndex};
use crate::model::Item;

/// A resolved `@(Type)` snapshot with a value lookup table
#[derive(Debug, Clone)]
pub struct ReferencedItems {
    item_type: String,
    list: ItemList,
    values: HashSet<Arc<str>>,
}

impl ReferencedItems {
    pub fn new(item_type: impl Into<String>, list: ItemList) -> Self {
        let values = list
            .iter()
            .map(|d| Arc::clone(d.item().value_arc()))
            .collect();
        Self {
            item_type: item_type.into(),
            list,
            values,
        }
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn list(&self) -> &ItemList {
        &self.list
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.values.contains(value)
    }
}

/// An `ItemSpec` bound to the snapshots its references resolve to
///
/// `references` holds one entry per reference fragment, in spec order.
#[derive(Debug, Clone)]
pub struct SpecMatcher<'a> {
    spec: &'a ItemSpec,
    references: Vec<ReferencedItems>,
}

impl<'a> SpecMatcher<'a> {
    /// # Errors
    ///
    /// Returns `Internal` if the resolved snapshots do not line up with the
    /// spec's reference fragments.
    pub fn new(spec: &'a ItemSpec, references: Vec<ReferencedItems>) -> Result<Self> {
        let expected: Vec<&str> = spec.references().map(|r| r.item_type.as_str()).collect();
        let resolved: Vec<&str> = references.iter().map(ReferencedItems::item_type).collect();
        if expected != resolved {
            return Err(ItemEvalError::Internal {
                message: format!(
                    "resolved references {:?} do not match spec '{}'",
                    resolved,
                    spec.text()
                ),
            });
        }
        Ok(Self { spec, references })
    }

    pub fn spec(&self) -> &ItemSpec {
        self.spec
    }

    pub fn references(&self) -> &[ReferencedItems] {
        &self.references
    }

    /// Whether any fragment matches the item's value
    pub fn matches<I: Item + ?Sized>(&self, item: &I) -> bool {
        let value = item.value();
        let mut references = self.references.iter();
        self.spec.fragments().iter().any(|fragment| match fragment {
            Fragment::Literal(text) => text == value,
            Fragment::Glob(glob) => glob.matches(value),
            Fragment::ItemReference(_) => references
                .next()
                .is_some_and(|resolved| resolved.contains_value(value)),
        })
    }

    /// Comparison keys of every referenced item for `state`
    pub fn metadata_index(
        &self,
        state: &MatchOnMetadataState,
        path_case_sensitive: bool,
    ) -> MetadataIndex {
        let items = self
            .references
            .iter()
            .flat_map(|r| r.list().iter())
            .map(|d| d.item());
        MetadataIndex::build(state, path_case_sensitive, items)
    }

    /// One-off metadata comparison; build a `metadata_index` for bulk use
    pub fn matches_on_metadata<I: Item + ?Sized>(
        &self,
        item: &I,
        state: &MatchOnMetadataState,
        path_case_sensitive: bool,
    ) -> bool {
        self.metadata_index(state, path_case_sensitive)
            .contains(item)
    }
}
