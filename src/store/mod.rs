//! Store Module
//!
//! The in-memory ordered key-value mapping every operation works against.
//!
//! ## Responsibilities
//! - Point reads, writes and deletes
//! - Inclusive range scans in key order
//! - Atomic range deletes (match and remove under one lock)
//!
//! ## Data Structure Choice
//! Using BTreeMap wrapped in a Mutex:
//! - Keys compare as `[u8]`, so ordering is unsigned byte-lexicographic
//!   and a proper prefix sorts before its extensions
//! - Range scans walk the tree directly, no sort step
//! - One lock for every operation keeps `delete_range` trivially atomic

mod table;

use serde::{Deserialize, Serialize};

pub use table::Store;

/// A key-value pair as returned by range operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvPair {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KvPair {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<(Vec<u8>, Vec<u8>)> for KvPair {
    fn from((key, value): (Vec<u8>, Vec<u8>)) -> Self {
        Self { key, value }
    }
}
