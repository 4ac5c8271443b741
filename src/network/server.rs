//! TCP Server
//!
//! Accepts connections and runs each session on its own thread.

use std::collections::HashMap;
use std::io::BufWriter;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;

use super::Connection;
use crate::config::{Config, StoreScope};
use crate::error::{KvError, Result};
use crate::protocol::{write_response, Response};
use crate::service::Service;
use crate::store::Store;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Cloneable handle that stops a running [`Server`]
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and close open sessions
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Open sessions, keyed by id, so shutdown can unblock their reads
type SessionRegistry = Arc<Mutex<HashMap<u64, TcpStream>>>;

/// TCP server for rangekv
pub struct Server {
    config: Config,
    listener: TcpListener,
    local_addr: SocketAddr,

    /// Server-owned store, present for `StoreScope::Shared`
    shared_store: Option<Arc<Store>>,

    sessions: SessionRegistry,
    next_session_id: AtomicU64,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Validate the config and bind the listener
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            KvError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;
        let local_addr = listener.local_addr()?;

        let shared_store = match config.store_scope {
            StoreScope::Shared => Some(Arc::new(Store::new())),
            StoreScope::Session => None,
        };

        tracing::info!(
            "Listening on {} (store scope: {:?})",
            local_addr,
            config.store_scope
        );

        Ok(Self {
            config,
            listener,
            local_addr,
            shared_store,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_session_id: AtomicU64::new(0),
            shutdown: ShutdownHandle::default(),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// The shared store, if sessions share one
    pub fn store(&self) -> Option<&Arc<Store>> {
        self.shared_store.as_ref()
    }

    /// Number of sessions currently open
    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Start the server (blocking)
    ///
    /// Returns after shutdown has been requested and every session thread
    /// has finished.
    pub fn run(&self) -> Result<()> {
        self.listener.set_nonblocking(true)?;
        let wait_group = WaitGroup::new();

        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    if let Err(e) = self.admit(stream, wait_group.clone()) {
                        tracing::warn!("Failed to start session for {}: {}", addr, e);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!("Shutting down, closing {} sessions", self.active_sessions());
        for stream in self.sessions.lock().values() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        wait_group.wait();

        Ok(())
    }

    /// Register a new session and spawn its thread, or refuse it when full
    fn admit(&self, stream: TcpStream, wait_group: WaitGroup) -> Result<()> {
        stream.set_nonblocking(false)?;

        if self.active_sessions() >= self.config.max_connections {
            tracing::warn!(
                "Refusing connection: max_connections ({}) reached",
                self.config.max_connections
            );
            let mut writer = BufWriter::new(stream);
            write_response(&mut writer, &Response::error("too many connections"))?;
            return Ok(());
        }

        let service = match &self.shared_store {
            Some(store) => Service::new(Arc::clone(store)),
            None => Service::with_new_store(),
        };

        let registered = stream.try_clone()?;
        let mut connection = Connection::new(stream, service)?;
        connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;

        // Only this thread inserts, so the capacity check above still holds
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        self.sessions.lock().insert(id, registered);

        let sessions = Arc::clone(&self.sessions);
        let spawned = thread::Builder::new()
            .name(format!("rangekv-session-{}", id))
            .spawn(move || {
                if let Err(e) = connection.handle() {
                    tracing::warn!("Session {} ended with error: {}", connection.peer_addr(), e);
                }
                sessions.lock().remove(&id);
                drop(wait_group);
            });

        if let Err(e) = spawned {
            self.sessions.lock().remove(&id);
            return Err(e.into());
        }

        Ok(())
    }
}
