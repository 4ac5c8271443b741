//! Tests for Service
//!
//! These tests verify:
//! - Each command maps to the right store call
//! - Replies convert to the expected wire responses
//! - Service instances own (or share) their store explicitly

use std::sync::Arc;

use rangekv::error::KvError;
use rangekv::protocol::{Command, Status};
use rangekv::service::{Reply, Service};
use rangekv::store::{KvPair, Store};

fn add(service: &Service, key: &str, value: &str) {
    let reply = service.dispatch(Command::Add {
        key: key.as_bytes().to_vec(),
        value: value.as_bytes().to_vec(),
    });
    assert_eq!(reply.unwrap(), Reply::Ack);
}

fn select(service: &Service, key: &str) -> Reply {
    service
        .dispatch(Command::Select {
            key: key.as_bytes().to_vec(),
        })
        .unwrap()
}

fn pair(key: &str, value: &str) -> KvPair {
    KvPair::new(key.as_bytes(), value.as_bytes())
}

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_helloworld_greeting() {
    let service = Service::with_new_store();
    let reply = service
        .dispatch(Command::HelloWorld {
            name: "Alice".to_string(),
        })
        .unwrap();

    assert_eq!(reply, Reply::Greeting("Hello, Alice!".to_string()));
    assert!(service.store().is_empty());
}

#[test]
fn test_add_then_select() {
    let service = Service::with_new_store();
    add(&service, "k", "v");

    assert_eq!(select(&service, "k"), Reply::Value(Some(b"v".to_vec())));
}

#[test]
fn test_select_missing_key() {
    let service = Service::with_new_store();
    assert_eq!(select(&service, "nope"), Reply::Value(None));
}

#[test]
fn test_select_empty_value_is_found() {
    let service = Service::with_new_store();
    add(&service, "k", "");
    assert_eq!(select(&service, "k"), Reply::Value(Some(Vec::new())));
}

#[test]
fn test_remove_acks_regardless_of_presence() {
    let service = Service::with_new_store();
    add(&service, "k", "v");

    let remove = || service.dispatch(Command::Remove { key: b"k".to_vec() }).unwrap();
    assert_eq!(remove(), Reply::Ack);
    assert_eq!(remove(), Reply::Ack);
    assert_eq!(select(&service, "k"), Reply::Value(None));
}

#[test]
fn test_select_range_and_remove_range() {
    let service = Service::with_new_store();
    for (k, v) in [("a", "1"), ("b", "2"), ("c", "3")] {
        add(&service, k, v);
    }

    let range = Command::SelectRange {
        start: b"a".to_vec(),
        end: b"b".to_vec(),
    };
    let expected = Reply::Pairs(vec![pair("a", "1"), pair("b", "2")]);
    assert_eq!(service.dispatch(range.clone()).unwrap(), expected);

    let removed = service.dispatch(Command::RemoveRange {
        start: b"a".to_vec(),
        end: b"b".to_vec(),
    })
    .unwrap();
    assert_eq!(removed, expected);
    assert_eq!(service.dispatch(range).unwrap(), Reply::Pairs(vec![]));
    assert_eq!(service.store().len(), 1);
}

#[test]
fn test_oversized_remove_range_leaves_store_untouched() {
    let service = Service::with_new_store();
    let big = vec![0xABu8; 9 * 1024 * 1024];
    service.add(b"a".to_vec(), big.clone());
    service.add(b"b".to_vec(), big.clone());

    let result = service.dispatch(Command::RemoveRange {
        start: b"a".to_vec(),
        end: b"b".to_vec(),
    });
    assert!(matches!(result, Err(KvError::FrameTooLarge { .. })));

    assert_eq!(service.store().len(), 2);
    assert_eq!(service.select(b"a"), Some(big.clone()));
    assert_eq!(service.select(b"b"), Some(big));

    // A range that fits still goes through
    assert_eq!(service.remove_range(b"a", b"a").unwrap().len(), 1);
    assert_eq!(service.store().len(), 1);
}

#[test]
fn test_oversized_select_range_is_error() {
    let service = Service::with_new_store();
    service.add(b"a".to_vec(), vec![1u8; 9 * 1024 * 1024]);
    service.add(b"b".to_vec(), vec![2u8; 9 * 1024 * 1024]);

    assert!(matches!(
        service.select_range(b"a", b"b"),
        Err(KvError::FrameTooLarge { .. })
    ));
    assert_eq!(service.store().len(), 2);
}

// =============================================================================
// Store Ownership Tests
// =============================================================================

#[test]
fn test_services_share_an_explicit_store() {
    let store = Arc::new(Store::new());
    let first = Service::new(Arc::clone(&store));
    let second = Service::new(Arc::clone(&store));

    add(&first, "shared", "yes");
    assert_eq!(select(&second, "shared"), Reply::Value(Some(b"yes".to_vec())));
}

#[test]
fn test_separate_services_are_isolated() {
    let first = Service::with_new_store();
    let second = Service::with_new_store();

    add(&first, "mine", "1");
    assert_eq!(select(&second, "mine"), Reply::Value(None));
}

// =============================================================================
// Reply → Response Tests
// =============================================================================

#[test]
fn test_reply_to_response() {
    let greeting = Reply::Greeting("Hello, x!".into()).into_response().unwrap();
    assert_eq!(greeting.status, Status::Ok);
    assert_eq!(greeting.payload_bytes(), b"Hello, x!");

    let ack = Reply::Ack.into_response().unwrap();
    assert_eq!(ack.status, Status::Ok);
    assert_eq!(ack.payload, None);

    let missing = Reply::Value(None).into_response().unwrap();
    assert_eq!(missing.status, Status::NotFound);

    let pairs = vec![pair("a", "1")];
    let response = Reply::Pairs(pairs.clone()).into_response().unwrap();
    assert_eq!(response.decode_pairs().unwrap(), pairs);
}
