use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    resource: String,
    language: String,
}

struct CachedEntry {
    generation: u64,
    value: Value,
}

/// In-memory cache for language-dependent content fetches.
///
/// Invalidation is a generation bump: entries written under an older
/// generation are treated as misses and lazily dropped. A fetch that
/// was in flight when the language changed may still store its
/// stale-language result, but it lands under the old generation and
/// is superseded by the next read.
#[derive(Clone)]
pub struct ContentCache {
    storage: Arc<DashMap<CacheKey, CachedEntry>>,
    generation: Arc<AtomicU64>,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn get(&self, resource: &str, language: &str) -> Option<Value> {
        let key = CacheKey {
            resource: resource.to_string(),
            language: language.to_string(),
        };
        let entry = self.storage.get(&key)?;
        if entry.generation != self.generation.load(Ordering::Acquire) {
            drop(entry);
            self.storage.remove(&key);
            debug!("Stale cache entry dropped: {} [{}]", resource, language);
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, resource: &str, language: &str, value: Value) {
        let key = CacheKey {
            resource: resource.to_string(),
            language: language.to_string(),
        };
        self.storage.insert(
            key,
            CachedEntry {
                generation: self.generation.load(Ordering::Acquire),
                value,
            },
        );
    }

    /// Invalidate every cached fetch. Subsequent reads re-fetch.
    pub fn invalidate_all(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("Content cache invalidated (generation {})", generation);
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hit_after_set() {
        let cache = ContentCache::new();
        cache.set("services", "pl", json!([{"id": 1}]));
        assert_eq!(cache.get("services", "pl"), Some(json!([{"id": 1}])));
    }

    #[test]
    fn miss_for_other_language() {
        let cache = ContentCache::new();
        cache.set("services", "pl", json!([]));
        assert_eq!(cache.get("services", "en"), None);
    }

    #[test]
    fn invalidation_forces_refetch() {
        let cache = ContentCache::new();
        cache.set("services", "pl", json!([1, 2]));
        assert_eq!(cache.len(), 1);

        cache.invalidate_all();
        assert_eq!(cache.get("services", "pl"), None);
        // The stale entry is dropped lazily by the missed read.
        assert!(cache.is_empty());
    }

    #[test]
    fn stale_generation_write_is_superseded() {
        let cache = ContentCache::new();
        cache.set("services", "pl", json!(["old"]));
        cache.invalidate_all();
        // A fresh write after invalidation is served again.
        cache.set("services", "pl", json!(["new"]));
        assert_eq!(cache.get("services", "pl"), Some(json!(["new"])));
    }
}
