//! Store implementation
//!
//! BTreeMap-based store behind a single parking_lot Mutex.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::Mutex;

use super::KvPair;
use crate::error::Result;

/// Ordered in-memory key-value store
///
/// ## Concurrency Model
///
/// Every operation takes the same mutex for its whole duration, so all
/// operations are mutually exclusive. In particular `delete_range` decides
/// what matches and removes it inside one critical section: no `put` or
/// `delete` can land between the two steps.
#[derive(Debug, Default)]
pub struct Store {
    data: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: Mutex::new(BTreeMap::new()),
        }
    }

    /// Insert a key-value pair, overwriting any existing value
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) {
        self.data.lock().insert(key, value);
    }

    /// Get a value by key
    ///
    /// `None` means the key is absent; `Some(vec![])` is a stored empty value.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.lock().get(key).cloned()
    }

    /// Remove a key, returning the value it held (no-op when absent)
    pub fn delete(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.lock().remove(key)
    }

    /// All pairs with `start <= key <= end`, in ascending key order
    ///
    /// A vacuous range (`start > end`) yields an empty vector.
    pub fn range(&self, start: &[u8], end: &[u8]) -> Vec<KvPair> {
        if start > end {
            return Vec::new();
        }

        let data = self.data.lock();
        data.range::<[u8], _>(inclusive(start, end))
            .map(|(k, v)| KvPair::new(k.clone(), v.clone()))
            .collect()
    }

    /// Remove every pair `range(start, end)` would return and hand them back
    pub fn delete_range(&self, start: &[u8], end: &[u8]) -> Vec<KvPair> {
        if start > end {
            return Vec::new();
        }

        let mut data = self.data.lock();
        let matched = matching_keys(&data, start, end);
        remove_keys(&mut data, matched)
    }

    /// Like `delete_range`, but the matched pairs are passed to `check`
    /// first, inside the same critical section. If `check` fails nothing is
    /// removed and its error is returned.
    pub fn delete_range_checked<F>(&self, start: &[u8], end: &[u8], check: F) -> Result<Vec<KvPair>>
    where
        F: FnOnce(&[KvPair]) -> Result<()>,
    {
        if start > end {
            check(&[])?;
            return Ok(Vec::new());
        }

        let mut data = self.data.lock();
        let matched: Vec<KvPair> = data
            .range::<[u8], _>(inclusive(start, end))
            .map(|(k, v)| KvPair::new(k.clone(), v.clone()))
            .collect();

        check(&matched)?;

        for pair in &matched {
            data.remove(&pair.key);
        }
        Ok(matched)
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.data.lock().clear();
    }
}

fn matching_keys(data: &BTreeMap<Vec<u8>, Vec<u8>>, start: &[u8], end: &[u8]) -> Vec<Vec<u8>> {
    data.range::<[u8], _>(inclusive(start, end))
        .map(|(k, _)| k.clone())
        .collect()
}

fn remove_keys(data: &mut BTreeMap<Vec<u8>, Vec<u8>>, keys: Vec<Vec<u8>>) -> Vec<KvPair> {
    keys.into_iter()
        .filter_map(|key| data.remove(&key).map(|value| KvPair { key, value }))
        .collect()
}

fn inclusive<'a>(start: &'a [u8], end: &'a [u8]) -> (Bound<&'a [u8]>, Bound<&'a [u8]>) {
    (Bound::Included(start), Bound::Included(end))
}
