//! Store Tests
//!
//! Tests verify:
//! - Basic put/get/delete
//! - Absent vs present-empty distinction
//! - Inclusive, ordered range scans
//! - Atomic range deletes
//! - Concurrent access patterns

use std::sync::Arc;
use std::thread;

use rangekv::error::KvError;
use rangekv::store::{KvPair, Store};

fn pair(key: &str, value: &str) -> KvPair {
    KvPair::new(key.as_bytes(), value.as_bytes())
}

fn store_with(entries: &[(&str, &str)]) -> Store {
    let store = Store::new();
    for (k, v) in entries {
        store.put(k.as_bytes().to_vec(), v.as_bytes().to_vec());
    }
    store
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_store_is_empty() {
    let store = Store::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn test_get_absent_key() {
    let store = Store::new();
    assert_eq!(store.get(b"missing"), None);
}

#[test]
fn test_put_and_get() {
    let store = Store::new();
    store.put(b"key1".to_vec(), b"value1".to_vec());
    assert_eq!(store.get(b"key1"), Some(b"value1".to_vec()));
}

#[test]
fn test_put_overwrites_existing() {
    let store = Store::new();
    store.put(b"key1".to_vec(), b"value1".to_vec());
    store.put(b"key1".to_vec(), b"value2".to_vec());

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(b"key1"), Some(b"value2".to_vec()));
}

#[test]
fn test_empty_value_is_not_absent() {
    let store = Store::new();
    store.put(b"empty".to_vec(), Vec::new());

    assert_eq!(store.get(b"empty"), Some(Vec::new()));
    assert_eq!(store.get(b"other"), None);
}

#[test]
fn test_empty_key_is_a_valid_key() {
    let store = Store::new();
    store.put(Vec::new(), b"root".to_vec());
    assert_eq!(store.get(b""), Some(b"root".to_vec()));
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_returns_previous_value() {
    let store = store_with(&[("k", "v")]);

    assert_eq!(store.delete(b"k"), Some(b"v".to_vec()));
    assert_eq!(store.get(b"k"), None);
}

#[test]
fn test_delete_absent_is_noop() {
    let store = store_with(&[("a", "1")]);

    assert_eq!(store.delete(b"zzz"), None);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_delete_twice_same_as_once() {
    let store = store_with(&[("a", "1"), ("b", "2")]);

    store.delete(b"a");
    let after_once = store.range(b"", b"\xff");
    store.delete(b"a");
    let after_twice = store.range(b"", b"\xff");

    assert_eq!(after_once, after_twice);
    assert_eq!(after_twice, vec![pair("b", "2")]);
}

#[test]
fn test_clear() {
    let store = store_with(&[("a", "1"), ("b", "2")]);
    store.clear();
    assert!(store.is_empty());
}

// =============================================================================
// Range Tests
// =============================================================================

#[test]
fn test_range_is_inclusive_and_sorted() {
    let store = store_with(&[("d", "4"), ("b", "2"), ("a", "1"), ("c", "3"), ("e", "5")]);

    let result = store.range(b"b", b"d");
    assert_eq!(result, vec![pair("b", "2"), pair("c", "3"), pair("d", "4")]);
}

#[test]
fn test_range_prefix_sorts_first() {
    let store = store_with(&[("test_zz", "c"), ("testx", "b"), ("test", "a"), ("test_key", "v")]);

    let result = store.range(b"test", b"test_z");
    assert_eq!(
        result,
        vec![pair("test", "a"), pair("test_key", "v"), pair("testx", "b")]
    );
}

#[test]
fn test_range_uses_unsigned_byte_order() {
    let store = Store::new();
    store.put(vec![0x7f], b"low".to_vec());
    store.put(vec![0x80], b"high".to_vec());
    store.put(vec![0xff, 0x00], b"top".to_vec());

    let keys: Vec<Vec<u8>> = store
        .range(&[0x00], &[0xff, 0xff])
        .into_iter()
        .map(|p| p.key)
        .collect();
    assert_eq!(keys, vec![vec![0x7f], vec![0x80], vec![0xff, 0x00]]);
}

#[test]
fn test_range_start_after_end_is_empty() {
    let store = store_with(&[("a", "1"), ("m", "2"), ("z", "3")]);
    assert!(store.range(b"z", b"a").is_empty());
}

#[test]
fn test_range_single_point() {
    let store = store_with(&[("a", "1"), ("b", "2")]);
    assert_eq!(store.range(b"b", b"b"), vec![pair("b", "2")]);
}

#[test]
fn test_range_no_matches() {
    let store = store_with(&[("a", "1"), ("z", "2")]);
    assert!(store.range(b"m", b"n").is_empty());
}

// =============================================================================
// Range Delete Tests
// =============================================================================

#[test]
fn test_delete_range_returns_what_range_returned() {
    let store = store_with(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);

    let before = store.range(b"b", b"c");
    let removed = store.delete_range(b"b", b"c");

    assert_eq!(removed, before);
    assert!(store.range(b"b", b"c").is_empty());
    assert_eq!(store.range(b"a", b"z"), vec![pair("a", "1"), pair("d", "4")]);
}

#[test]
fn test_delete_range_start_after_end_removes_nothing() {
    let store = store_with(&[("a", "1"), ("b", "2")]);

    assert!(store.delete_range(b"b", b"a").is_empty());
    assert_eq!(store.len(), 2);
}

#[test]
fn test_delete_range_on_empty_store() {
    let store = Store::new();
    assert!(store.delete_range(b"a", b"z").is_empty());
}

#[test]
fn test_delete_range_checked_failure_keeps_pairs() {
    let store = store_with(&[("a", "1"), ("b", "2"), ("c", "3")]);

    let result = store.delete_range_checked(b"a", b"b", |pairs| {
        assert_eq!(pairs, &[pair("a", "1"), pair("b", "2")][..]);
        Err(KvError::FrameTooLarge { len: 2, max: 1 })
    });

    assert!(matches!(result, Err(KvError::FrameTooLarge { .. })));
    assert_eq!(store.len(), 3);
    assert_eq!(store.get(b"a"), Some(b"1".to_vec()));
}

#[test]
fn test_delete_range_checked_success_removes_pairs() {
    let store = store_with(&[("a", "1"), ("b", "2"), ("c", "3")]);

    let removed = store.delete_range_checked(b"b", b"c", |_| Ok(())).unwrap();

    assert_eq!(removed, vec![pair("b", "2"), pair("c", "3")]);
    assert_eq!(store.range(b"a", b"z"), vec![pair("a", "1")]);
}

#[test]
fn test_delete_range_checked_start_after_end() {
    let store = store_with(&[("a", "1"), ("b", "2")]);

    let removed = store
        .delete_range_checked(b"b", b"a", |pairs| {
            assert!(pairs.is_empty());
            Ok(())
        })
        .unwrap();

    assert!(removed.is_empty());
    assert_eq!(store.len(), 2);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_writers() {
    let store = Arc::new(Store::new());
    let mut handles = Vec::new();

    for t in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..250 {
                let key = format!("t{}-{:04}", t, i);
                store.put(key.into_bytes(), vec![t as u8]);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 1000);
}

#[test]
fn test_delete_range_is_atomic_against_writers() {
    // Writers keep re-inserting keys inside the range while another thread
    // range-deletes. Every removed pair must carry a value that was written,
    // and each call must return keys in ascending order with no duplicates.
    let store = Arc::new(Store::new());
    let mut writers = Vec::new();

    for t in 0..3u8 {
        let store = Arc::clone(&store);
        writers.push(thread::spawn(move || {
            for round in 0..200u32 {
                let key = format!("k{:03}", round % 50);
                store.put(key.into_bytes(), vec![t]);
            }
        }));
    }

    let deleter = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let mut total = 0;
            for _ in 0..100 {
                let removed = store.delete_range(b"k000", b"k049");
                assert!(removed.windows(2).all(|w| w[0].key < w[1].key));
                assert!(removed.iter().all(|p| p.value.len() == 1 && p.value[0] < 3));
                total += removed.len();
            }
            total
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    deleter.join().unwrap();

    // Whatever is left is still well-formed and in range
    let leftover = store.delete_range(b"k000", b"k049");
    assert!(leftover.len() <= 50);
    assert!(store.is_empty());
}
