//! Response definitions
//!
//! Represents responses to clients.

use super::codec::check_payload_len;
use crate::error::Result;
use crate::store::KvPair;

/// Size in bytes of a pair list once bincode-encoded for the wire
pub fn encoded_pairs_len(pairs: &[KvPair]) -> Result<usize> {
    Ok(bincode::serialized_size(pairs)? as usize)
}

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

/// A response to send to client
///
/// `payload` is `None` for an empty body. On the wire an empty body and a
/// zero-length one look the same, so a selected empty value decodes as
/// `Ok` with `None`; the status alone carries presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (value, greeting, encoded pairs, or error message)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create an OK response with no payload
    pub fn ack() -> Self {
        Self::ok(None)
    }

    /// Create an OK response carrying a bincode-encoded pair list
    ///
    /// Fails with `FrameTooLarge` if the list would not fit in one frame.
    pub fn pairs(pairs: &[KvPair]) -> Result<Self> {
        check_payload_len(encoded_pairs_len(pairs)?)?;
        Ok(Self::ok(Some(bincode::serialize(pairs)?)))
    }

    /// Create a NOT_FOUND response
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Payload bytes, empty when absent
    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }

    /// Decode the payload as a pair list (empty payload = empty list)
    pub fn decode_pairs(&self) -> Result<Vec<KvPair>> {
        match self.payload.as_deref() {
            None | Some([]) => Ok(Vec::new()),
            Some(bytes) => Ok(bincode::deserialize(bytes)?),
        }
    }

    /// Error message carried by an ERROR response
    pub fn error_message(&self) -> String {
        String::from_utf8_lossy(self.payload_bytes()).into_owned()
    }
}
