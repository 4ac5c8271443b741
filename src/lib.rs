//! # rangekv
//!
//! A minimal ordered key-value store served over TCP with:
//! - Point insert / lookup / delete
//! - Inclusive range scans in byte-lexicographic key order
//! - Atomic range deletes
//! - A `helloworld` liveness check
//!
//! All state is in memory and lives only as long as the server process.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │             (one thread per connection)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Command (closed enum)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Service                                 │
//! │        (dispatch, one call at a time per session)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │     Store     │
//!               │ (Mutex<BTree>)│
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod service;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{Config, StoreScope};
pub use store::{KvPair, Store};
pub use service::{Reply, Service};
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rangekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
