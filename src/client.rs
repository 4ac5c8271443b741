//! Blocking client
//!
//! Sends one command at a time over a single connection and waits for the
//! matching response.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{KvError, Result};
use crate::protocol::{read_response, write_command, Command, Response, Status};
use crate::store::KvPair;

/// A connection to a rangekv server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| KvError::Network(format!("connect failed: {}", e)))?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Round-trip the diagnostic greeting
    pub fn helloworld(&mut self, name: &str) -> Result<String> {
        let response = self.call(Command::HelloWorld {
            name: name.to_string(),
        })?;
        let bytes = expect_ok(response, "HELLOWORLD")?.unwrap_or_default();
        String::from_utf8(bytes)
            .map_err(|e| KvError::UnexpectedResponse(format!("greeting is not UTF-8: {}", e)))
    }

    /// Insert or overwrite a key
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let response = self.call(Command::Add {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        expect_ok(response, "ADD").map(|_| ())
    }

    /// Look up a key; `None` when the server reports it absent
    pub fn select(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let response = self.call(Command::Select { key: key.to_vec() })?;
        match response.status {
            Status::NotFound => Ok(None),
            _ => Ok(Some(expect_ok(response, "SELECT")?.unwrap_or_default())),
        }
    }

    /// Delete a key (acknowledged even when absent)
    pub fn remove(&mut self, key: &[u8]) -> Result<()> {
        let response = self.call(Command::Remove { key: key.to_vec() })?;
        expect_ok(response, "REMOVE").map(|_| ())
    }

    /// All pairs in `[start, end]`, ascending
    pub fn select_range(&mut self, start: &[u8], end: &[u8]) -> Result<Vec<KvPair>> {
        let response = self.call(Command::SelectRange {
            start: start.to_vec(),
            end: end.to_vec(),
        })?;
        expect_pairs(response, "SELECT_RANGE")
    }

    /// Delete all pairs in `[start, end]` and return them, ascending
    pub fn remove_range(&mut self, start: &[u8], end: &[u8]) -> Result<Vec<KvPair>> {
        let response = self.call(Command::RemoveRange {
            start: start.to_vec(),
            end: end.to_vec(),
        })?;
        expect_pairs(response, "REMOVE_RANGE")
    }

    /// Send a command and read its response
    pub fn call(&mut self, command: Command) -> Result<Response> {
        write_command(&mut self.writer, &command)?;
        read_response(&mut self.reader)
    }
}

fn expect_ok(response: Response, cmd: &str) -> Result<Option<Vec<u8>>> {
    match response.status {
        Status::Ok => Ok(response.payload),
        Status::Error => Err(KvError::Server(response.error_message())),
        Status::NotFound => Err(KvError::UnexpectedResponse(format!(
            "{} answered NOT_FOUND",
            cmd
        ))),
    }
}

fn expect_pairs(response: Response, cmd: &str) -> Result<Vec<KvPair>> {
    match response.status {
        Status::Ok => response.decode_pairs(),
        _ => expect_ok(response, cmd).map(|_| Vec::new()),
    }
}
