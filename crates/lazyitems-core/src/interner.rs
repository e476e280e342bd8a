//! Cross-document string cache
//!
//! Project documents loaded side by side repeat most of their strings. The
//! cache hands out one shared `Arc<str>` per distinct value and counts how
//! many documents hold it. Unloading a document (`clear`) releases its
//! entries; an entry is evicted as soon as no document holds it.
//!
//! The evaluator never calls the cache; hosts intern values before
//! declaring operations.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use lazyitems_core_types::DocumentId;

/// Keys starting with this header are synthetic per-instance values and
/// are never shared
pub const DUMMY_GLOBAL_PROPERTY_HEADER: &str = "MSBuildProjectInstance";

const INITIAL_CAPACITY: usize = 5000;

#[derive(Debug)]
struct Entry {
    value: Arc<str>,
    ref_count: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    strings: HashMap<Arc<str>, Entry>,
    documents: HashMap<DocumentId, HashSet<Arc<str>>>,
}

/// Reference-counted string interner keyed by value
#[derive(Debug)]
pub struct StringCache {
    state: Mutex<CacheState>,
}

impl Default for StringCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StringCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState {
                strings: HashMap::with_capacity(INITIAL_CAPACITY),
                documents: HashMap::new(),
            }),
        }
    }

    /// Canonical instance of `key`, recorded against `document`
    ///
    /// Each document counts once per entry no matter how often it adds the
    /// same key. The empty string and dummy-header keys are not tracked.
    pub fn add(&self, key: &str, document: &DocumentId) -> Arc<str> {
        if key.is_empty() {
            return empty();
        }
        if key.starts_with(DUMMY_GLOBAL_PROPERTY_HEADER) {
            return Arc::from(key);
        }

        let mut state = self.lock();
        let CacheState { strings, documents } = &mut *state;

        if !strings.contains_key(key) {
            let value: Arc<str> = Arc::from(key);
            strings.insert(
                Arc::clone(&value),
                Entry {
                    value,
                    ref_count: 0,
                },
            );
        }
        let Some(entry) = strings.get_mut(key) else {
            return Arc::from(key);
        };
        let held = documents.entry(document.clone()).or_default();
        if held.insert(Arc::clone(&entry.value)) {
            entry.ref_count += 1;
        }
        Arc::clone(&entry.value)
    }

    /// Canonical instance of `key` if some document holds it
    pub fn get(&self, key: &str) -> Option<Arc<str>> {
        if key.is_empty() {
            return Some(empty());
        }
        self.lock()
            .strings
            .get(key)
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Release every entry held by `document`
    ///
    /// Unknown documents are ignored.
    pub fn clear(&self, document: &DocumentId) {
        let mut state = self.lock();
        let CacheState { strings, documents } = &mut *state;

        let Some(held) = documents.remove(document) else {
            return;
        };
        let mut evicted = 0usize;
        for key in held {
            if let Some(entry) = strings.get_mut(&key) {
                entry.ref_count -= 1;
                if entry.ref_count == 0 {
                    strings.remove(&key);
                    evicted += 1;
                }
            }
        }
        tracing::debug!(document = document.as_str(), evicted, "released document strings");
    }

    /// Number of distinct cached strings
    pub fn count(&self) -> usize {
        self.lock().strings.len()
    }

    /// Number of documents holding at least one entry
    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn empty() -> Arc<str> {
    static EMPTY: OnceLock<Arc<str>> = OnceLock::new();
    Arc::clone(EMPTY.get_or_init(|| Arc::from("")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_returns_same_instance() {
        let cache = StringCache::new();
        let doc = DocumentId::new();

        let a = cache.add("Compile", &doc);
        let b = cache.add(&String::from("Compile"), &doc);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_hit_hands_out_canonical_instance() {
        let cache = StringCache::new();
        let doc = DocumentId::new();

        let first = cache.add("Content", &doc);
        let held = Arc::strong_count(&first);
        let again = cache.add("Content", &doc);

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(Arc::strong_count(&first), held + 1);
    }

    #[test]
    fn test_shared_across_documents_until_last_clear() {
        let cache = StringCache::new();
        let first = DocumentId::new();
        let second = DocumentId::new();

        let a = cache.add("value", &first);
        let b = cache.add("value", &second);
        assert!(Arc::ptr_eq(&a, &b));

        cache.clear(&first);
        assert!(cache.get("value").is_some());

        cache.clear(&second);
        assert!(cache.get("value").is_none());
        assert_eq!(cache.count(), 0);
        assert_eq!(cache.document_count(), 0);
    }

    #[test]
    fn test_repeated_add_counts_document_once() {
        let cache = StringCache::new();
        let doc = DocumentId::new();
        cache.add("x", &doc);
        cache.add("x", &doc);
        cache.add("x", &doc);

        cache.clear(&doc);
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_empty_key_is_shared_and_untracked() {
        let cache = StringCache::new();
        let doc = DocumentId::new();

        let a = cache.add("", &doc);
        let b = cache.get("").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_dummy_header_is_not_interned() {
        let cache = StringCache::new();
        let doc = DocumentId::new();
        let key = "MSBuildProjectInstance42";

        let a = cache.add(key, &doc);
        let b = cache.add(key, &doc);
        assert_eq!(&*a, key);
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(cache.get(key).is_none());
    }

    #[test]
    fn test_clear_unknown_document_is_noop() {
        let cache = StringCache::new();
        let doc = DocumentId::new();
        cache.add("kept", &doc);

        cache.clear(&DocumentId::new());
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_cache_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StringCache>();
    }
}
