//! Connection Handler
//!
//! Handles individual client connections (sessions).

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{KvError, Result};
use crate::protocol::{check_payload_len, read_command, write_response, Command, Response};
use crate::service::Service;

/// Lifecycle of a client session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting calls, dispatched one at a time
    Open,

    /// No further calls accepted
    Closed,
}

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Dispatcher bound to this session's store
    service: Service,

    /// Peer address for logging
    peer_addr: String,

    state: SessionState,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O on cloned read/write handles
    pub fn new(stream: TcpStream, service: Service) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            service,
            peer_addr,
            state: SessionState::Open,
        })
    }

    /// Configure connection timeouts (0 leaves the timeout unset)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and answers each before reading the next.
    /// Returns when the client disconnects or an unrecoverable error occurs;
    /// the session is `Closed` afterwards either way.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Session opened for {}", self.peer_addr);

        let result = self.serve();
        self.state = SessionState::Closed;

        tracing::debug!("Session closed for {}", self.peer_addr);
        result
    }

    fn serve(&mut self) -> Result<()> {
        while self.state == SessionState::Open {
            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(e) if e.is_disconnect() => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(e) if e.is_timeout() => {
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(KvError::Protocol(msg)) => {
                    // Frame fully consumed, so the stream is still in sync
                    tracing::warn!("Malformed request from {}: {}", self.peer_addr, msg);
                    self.send_or_close(Response::error(&msg))?;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    if let Err(send_err) = self.send_response(Response::error(&e.to_string())) {
                        tracing::debug!(
                            "Could not report read error to {}: {}",
                            self.peer_addr,
                            send_err
                        );
                    }
                    return Err(e);
                }
            };

            tracing::trace!("Received command from {}: {:?}", self.peer_addr, command);

            let response = self.execute_command(command);
            self.send_or_close(response)?;
        }

        Ok(())
    }

    /// Execute a command and return a response
    ///
    /// The store mutation is complete before this returns, so a response
    /// that never reaches the client cannot leave a partial change behind.
    fn execute_command(&self, command: Command) -> Response {
        let mutation = command.is_mutation();
        let response = self
            .service
            .dispatch(command)
            .and_then(|reply| reply.into_response())
            .and_then(|response| {
                check_payload_len(response.payload_bytes().len())?;
                Ok(response)
            });

        match response {
            Ok(response) => {
                if mutation {
                    tracing::trace!("Mutation from {} committed", self.peer_addr);
                }
                response
            }
            Err(e) => {
                tracing::warn!("Rejected request from {}: {}", self.peer_addr, e);
                Response::error(&e.to_string())
            }
        }
    }

    /// Send a response, moving to `Closed` if the client already went away
    fn send_or_close(&mut self, response: Response) -> Result<()> {
        if let Err(e) = self.send_response(response) {
            self.state = SessionState::Closed;
            if e.is_disconnect() {
                tracing::debug!(
                    "Client {} disconnected before response could be sent: {}",
                    self.peer_addr,
                    e
                );
                return Ok(());
            }
            tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
            return Err(e);
        }
        Ok(())
    }

    /// Send a response to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }
}
