use std::collections::BTreeMap;
use std::sync::Arc;

/// Metadata attached to an item
///
/// Names are kept in sorted order so iteration is deterministic. Values are
/// shared `Arc<str>` so interned strings can be stored without copying.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    data: BTreeMap<String, Arc<str>>,
}

impl Metadata {
    /// Create a new empty Metadata instance
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(|v| &**v)
    }

    /// Set a value by name, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Arc<str>>) {
        self.data.insert(name.into(), value.into());
    }

    /// Remove a value by name
    pub fn remove(&mut self, name: &str) -> Option<Arc<str>> {
        self.data.remove(name)
    }

    /// Check if a name exists
    pub fn contains_key(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), &**v))
    }

    /// Get the number of metadata entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if metadata is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy of `self` with every entry of `overrides` applied on top
    pub fn merged(&self, overrides: &Metadata) -> Metadata {
        let mut data = self.data.clone();
        for (name, value) in &overrides.data {
            data.insert(name.clone(), value.clone());
        }
        Metadata { data }
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<Arc<str>>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut metadata = Metadata::new();
        metadata.set("Link", "a/b.cs");
        assert_eq!(metadata.get("Link"), Some("a/b.cs"));
        assert!(metadata.contains_key("Link"));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_merged_overrides_without_touching_original() {
        let base: Metadata = [("A", "1"), ("B", "2")].into_iter().collect();
        let overrides: Metadata = [("B", "3"), ("C", "4")].into_iter().collect();

        let merged = base.merged(&overrides);
        assert_eq!(merged.get("A"), Some("1"));
        assert_eq!(merged.get("B"), Some("3"));
        assert_eq!(merged.get("C"), Some("4"));
        assert_eq!(base.get("B"), Some("2"));
    }

    #[test]
    fn test_iteration_is_sorted() {
        let metadata: Metadata = [("Z", "1"), ("A", "2")].into_iter().collect();
        let names: Vec<_> = metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["A", "Z"]);
    }
}
