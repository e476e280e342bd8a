//! Persistent item lists
//!
//! `ItemList` is an immutable snapshot. `ItemListBuilder` is the mutable
//! side used by the fold. Both share one reference-counted buffer of
//! `ItemData`, and items inside it are themselves `Arc`s. A builder only
//! copies the buffer (pointer copies, never item copies) the first time it
//! mutates while a snapshot still shares it, so earlier snapshots stay valid
//! and unchanged.

use std::sync::Arc;

use crate::model::{Item, ItemData};

/// Immutable, cheaply clonable sequence of items
#[derive(Debug, Clone, Default)]
pub struct ItemList {
    items: Arc<Vec<ItemData>>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ItemData> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemData> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ItemData] {
        &self.items
    }

    /// Item values in list order
    pub fn values(&self) -> Vec<&str> {
        self.items.iter().map(|d| d.item().value()).collect()
    }

    /// Start a builder seeded with this snapshot (no copy until mutation)
    pub fn to_builder(&self) -> ItemListBuilder {
        ItemListBuilder {
            items: Arc::clone(&self.items),
        }
    }

    /// Whether two snapshots share the same storage
    pub fn shares_storage_with(&self, other: &ItemList) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a ItemData;
    type IntoIter = std::slice::Iter<'a, ItemData>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Mutable builder over a shared item buffer
#[derive(Debug, Default)]
pub struct ItemListBuilder {
    items: Arc<Vec<ItemData>>,
}

impl ItemListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemData> {
        self.items.iter()
    }

    pub fn push(&mut self, item: ItemData) {
        Arc::make_mut(&mut self.items).push(item);
    }

    pub fn extend<T: IntoIterator<Item = ItemData>>(&mut self, items: T) {
        let mut items = items.into_iter().peekable();
        if items.peek().is_some() {
            Arc::make_mut(&mut self.items).extend(items);
        }
    }

    /// Drop everything in O(1); snapshots keep their contents
    pub fn clear(&mut self) {
        self.items = Arc::new(Vec::new());
    }

    /// Keep only items for which `keep` returns true, preserving order
    ///
    /// The buffer is left shared when nothing would be removed.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ItemData) -> bool,
    {
        let Some(first_removed) = self.items.iter().position(|d| !keep(d)) else {
            return;
        };
        let items = Arc::make_mut(&mut self.items);
        let mut index = 0;
        items.retain(|d| {
            let kept = index < first_removed || (index != first_removed && keep(d));
            index += 1;
            kept
        });
    }

    /// Replace items in place; `replace` returns `Some` for items to swap
    ///
    /// Returns how many items were replaced.
    pub fn replace_where<F>(&mut self, mut replace: F) -> usize
    where
        F: FnMut(&ItemData) -> Option<ItemData>,
    {
        let replacements: Vec<(usize, ItemData)> = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, d)| replace(d).map(|new| (index, new)))
            .collect();
        if replacements.is_empty() {
            return 0;
        }
        let items = Arc::make_mut(&mut self.items);
        let count = replacements.len();
        for (index, new) in replacements {
            items[index] = new;
        }
        count
    }

    /// Snapshot of the current contents, O(1)
    pub fn snapshot(&self) -> ItemList {
        ItemList {
            items: Arc::clone(&self.items),
        }
    }

    /// Freeze into the final snapshot
    pub fn build(self) -> ItemList {
        ItemList { items: self.items }
    }
}
