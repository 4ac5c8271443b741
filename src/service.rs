//! Service Module
//!
//! Translates protocol commands into store calls and store results into
//! replies. One `Service` is bound to one store handle; depending on the
//! configured [`StoreScope`](crate::config::StoreScope) that handle is either
//! shared with other sessions or owned by this session alone.

use std::sync::Arc;

use crate::error::Result;
use crate::protocol::{check_payload_len, encoded_pairs_len, Command, Response};
use crate::store::{KvPair, Store};

/// Typed outcome of one dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Greeting for HELLOWORLD
    Greeting(String),

    /// Mutation applied, no payload
    Ack,

    /// SELECT result; `None` when the key is absent
    Value(Option<Vec<u8>>),

    /// Pairs read or removed by a range command, ascending by key
    Pairs(Vec<KvPair>),
}

impl Reply {
    /// Convert into a wire response
    pub fn into_response(self) -> Result<Response> {
        Ok(match self {
            Reply::Greeting(greeting) => Response::ok(Some(greeting.into_bytes())),
            Reply::Ack => Response::ack(),
            Reply::Value(Some(value)) => Response::ok(Some(value)),
            Reply::Value(None) => Response::not_found(),
            Reply::Pairs(pairs) => Response::pairs(&pairs)?,
        })
    }
}

/// Request dispatcher bound to a single store
#[derive(Debug, Clone)]
pub struct Service {
    store: Arc<Store>,
}

impl Service {
    /// Bind a service to an existing store handle
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Create a service that owns a fresh, empty store
    pub fn with_new_store() -> Self {
        Self::new(Arc::new(Store::new()))
    }

    /// The store this service dispatches to
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Execute one command against the store
    ///
    /// Fails only when a range result would not fit in one response frame;
    /// a failed `RemoveRange` leaves the store untouched.
    pub fn dispatch(&self, command: Command) -> Result<Reply> {
        Ok(match command {
            Command::HelloWorld { name } => Reply::Greeting(self.helloworld(&name)),
            Command::Add { key, value } => {
                self.add(key, value);
                Reply::Ack
            }
            Command::Select { key } => Reply::Value(self.select(&key)),
            Command::Remove { key } => {
                self.remove(&key);
                Reply::Ack
            }
            Command::SelectRange { start, end } => Reply::Pairs(self.select_range(&start, &end)?),
            Command::RemoveRange { start, end } => Reply::Pairs(self.remove_range(&start, &end)?),
        })
    }

    pub fn helloworld(&self, name: &str) -> String {
        format!("Hello, {}!", name)
    }

    pub fn add(&self, key: Vec<u8>, value: Vec<u8>) {
        self.store.put(key, value);
    }

    pub fn select(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.get(key)
    }

    /// Acknowledged whether or not the key existed
    pub fn remove(&self, key: &[u8]) {
        if self.store.delete(key).is_none() {
            tracing::trace!("remove of absent key ({} bytes)", key.len());
        }
    }

    pub fn select_range(&self, start: &[u8], end: &[u8]) -> Result<Vec<KvPair>> {
        let pairs = self.store.range(start, end);
        ensure_deliverable(&pairs)?;
        Ok(pairs)
    }

    /// Removal only happens if the removed pairs can be sent back
    pub fn remove_range(&self, start: &[u8], end: &[u8]) -> Result<Vec<KvPair>> {
        let removed = self
            .store
            .delete_range_checked(start, end, ensure_deliverable)?;
        tracing::trace!("remove_range removed {} pairs", removed.len());
        Ok(removed)
    }
}

fn ensure_deliverable(pairs: &[KvPair]) -> Result<()> {
    check_payload_len(encoded_pairs_len(pairs)?)
}
