use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An ordered cache of shared objects that expire once nothing outside of the cache has used them for a while.
///
/// Objects are stored as `Arc<V>`. An entry is "externally referenced" whenever its strong count exceeds 1, i.e. some
/// holder besides the cache keeps it alive. Eviction does not happen inline; the owner calls `evict_expired` (usually
/// once per frame), which:
///   1. refreshes the last-use time of every externally referenced entry, then
///   2. removes the entries that are referenced only by the cache and were last used more than `expiry_delay` ago.
///
/// Because keys are ordered, `lower_bound` can find the nearest stored key at or below any query. With a key type
/// whose ordering groups related keys together (like `ChunkKey`), this finds a "sibling" entry without an exact match.
///
/// Reads take `&self` and writes take `&mut self`, so a cache shared between threads needs an outer lock that admits a
/// single writer.
#[derive(Debug)]
pub struct ObjectCache<K, V> {
    store: BTreeMap<K, CachedObject<V>>,
    expiry_delay: Duration,
}

#[derive(Debug)]
struct CachedObject<V> {
    value: Arc<V>,
    last_used: Instant,
}

impl<K, V> ObjectCache<K, V>
where
    K: Ord,
{
    pub fn new(expiry_delay: Duration) -> Self {
        Self {
            store: BTreeMap::new(),
            expiry_delay,
        }
    }

    pub fn expiry_delay(&self) -> Duration {
        self.expiry_delay
    }

    /// Get a new reference to the object at `key`. This does not refresh the entry's last-use time; holding on to the
    /// returned reference until the next `evict_expired` does.
    #[inline]
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.store.get(key).map(|entry| entry.value.clone())
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    pub fn lower_bound(&self, key: &K) -> Option<(&K, Arc<V>)> {
        self.store
            .range::<K, _>(..=key)
            .next_back()
            .map(|(k, entry)| (k, entry.value.clone()))
    }

    /// Inserts `value` at `key`, last used at `now`, returning the replaced object, if any.
    pub fn insert(&mut self, key: K, value: Arc<V>, now: Instant) -> Option<Arc<V>> {
        self.store
            .insert(
                key,
                CachedObject {
                    value,
                    last_used: now,
                },
            )
            .map(|old| old.value)
    }

    pub fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        self.store.remove(key).map(|entry| entry.value)
    }

    /// Refreshes externally referenced entries and removes expired ones. Returns the number of entries removed.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let expiry_delay = self.expiry_delay;
        let len_before = self.store.len();

        self.store.retain(|_, entry| {
            if Arc::strong_count(&entry.value) > 1 {
                entry.last_used = now;
                return true;
            }

            now.saturating_duration_since(entry.last_used) <= expiry_delay
        });

        len_before - self.store.len()
    }

    /// Delete all entries.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// The number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterate over all `(key, object)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Arc<V>)> {
        self.store.iter().map(|(k, entry)| (k, &entry.value))
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
