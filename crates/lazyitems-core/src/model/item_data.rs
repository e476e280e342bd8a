use std::sync::Arc;

use super::item::ProjectItem;

/// An item as it sits in a materialized list
///
/// Pairs a shared, immutable item with the order of the declaration that
/// produced it. Identity (for remove selection) is the `Arc` allocation, not
/// the value: two Includes of `a.cs` yield two distinct entries.
#[derive(Debug, Clone)]
pub struct ItemData {
    item: Arc<ProjectItem>,
    element_order: usize,
}

impl ItemData {
    pub fn new(item: Arc<ProjectItem>, element_order: usize) -> Self {
        Self {
            item,
            element_order,
        }
    }

    pub fn item(&self) -> &ProjectItem {
        &self.item
    }

    pub fn shared_item(&self) -> &Arc<ProjectItem> {
        &self.item
    }

    /// Order of the declaration that added this item
    pub fn element_order(&self) -> usize {
        self.element_order
    }

    /// Same position and order, different item
    pub fn with_item(&self, item: ProjectItem) -> Self {
        Self {
            item: Arc::new(item),
            element_order: self.element_order,
        }
    }

    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.item) as usize
    }
}
