//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor loop (non-blocking poll, checks the shutdown flag)
//! - One thread per connection, calls served strictly in order
//! - Commands routed through `Service`

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::{Connection, SessionState};
