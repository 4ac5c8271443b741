//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - HELLOWORLD:   name (UTF-8)
//! - ADD:          key_len (4 bytes) + key + value
//! - SELECT:       key_len (4 bytes) + key
//! - REMOVE:       key_len (4 bytes) + key
//! - SELECT_RANGE: start_len (4 bytes) + start + end
//! - REMOVE_RANGE: start_len (4 bytes) + start + end
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use super::{Command, CommandType, Response, Status};
use crate::error::{KvError, Result};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB). This is also the effective cap on key and
/// value sizes.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload. Fails with
/// `FrameTooLarge` when the payload would exceed `MAX_PAYLOAD_SIZE`.
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let mut payload = BytesMut::new();

    match command {
        Command::HelloWorld { name } => payload.put_slice(name.as_bytes()),
        Command::Add { key, value } => {
            put_prefixed(&mut payload, key);
            payload.put_slice(value);
        }
        Command::Select { key } | Command::Remove { key } => put_prefixed(&mut payload, key),
        Command::SelectRange { start, end } | Command::RemoveRange { start, end } => {
            put_prefixed(&mut payload, start);
            payload.put_slice(end);
        }
    }

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_type, payload) = split_frame(bytes, "")?;

    let cmd_type = CommandType::from_u8(cmd_type).ok_or_else(|| {
        KvError::Protocol(format!("Unknown command type: 0x{:02x}", cmd_type))
    })?;

    decode_payload(cmd_type, payload)
}

/// Decode a command payload once the command type is known
fn decode_payload(cmd_type: CommandType, payload: &[u8]) -> Result<Command> {
    match cmd_type {
        CommandType::HelloWorld => {
            let name = std::str::from_utf8(payload).map_err(|e| {
                KvError::Protocol(format!("HELLOWORLD command: name is not UTF-8: {}", e))
            })?;
            Ok(Command::HelloWorld {
                name: name.to_string(),
            })
        }
        CommandType::Add => {
            let (key, value) = take_prefixed(payload, "ADD", "key")?;
            Ok(Command::Add {
                key: key.to_vec(),
                value: value.to_vec(),
            })
        }
        CommandType::Select => Ok(Command::Select {
            key: take_single_key(payload, "SELECT")?,
        }),
        CommandType::Remove => Ok(Command::Remove {
            key: take_single_key(payload, "REMOVE")?,
        }),
        CommandType::SelectRange => {
            let (start, end) = take_prefixed(payload, "SELECT_RANGE", "start")?;
            Ok(Command::SelectRange {
                start: start.to_vec(),
                end: end.to_vec(),
            })
        }
        CommandType::RemoveRange => {
            let (start, end) = take_prefixed(payload, "REMOVE_RANGE", "start")?;
            Ok(Command::RemoveRange {
                start: start.to_vec(),
                end: end.to_vec(),
            })
        }
    }
}

/// Split `len (4) + field + rest` into `(field, rest)`
fn take_prefixed<'a>(payload: &'a [u8], cmd: &str, field: &str) -> Result<(&'a [u8], &'a [u8])> {
    let mut buf = payload;
    if buf.remaining() < 4 {
        return Err(KvError::Protocol(format!(
            "{} command: missing {} length",
            cmd, field
        )));
    }

    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(KvError::Protocol(format!(
            "{} command: incomplete {} (expected {}, got {})",
            cmd,
            field,
            len,
            buf.remaining()
        )));
    }

    Ok(buf.split_at(len))
}

/// A payload that is exactly one length-prefixed key
fn take_single_key(payload: &[u8], cmd: &str) -> Result<Vec<u8>> {
    let (key, rest) = take_prefixed(payload, cmd, "key")?;
    if !rest.is_empty() {
        return Err(KvError::Protocol(format!(
            "{} command: unexpected {} trailing bytes",
            cmd,
            rest.len()
        )));
    }
    Ok(key.to_vec())
}

fn put_prefixed(buf: &mut BytesMut, field: &[u8]) {
    buf.put_u32(field.len() as u32);
    buf.put_slice(field);
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload. Fails with
/// `FrameTooLarge` when the payload would exceed `MAX_PAYLOAD_SIZE`.
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    frame(response.status as u8, response.payload_bytes())
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response ")?;
    build_response(status_byte, payload.to_vec())
}

fn build_response(status_byte: u8, payload: Vec<u8>) -> Result<Response> {
    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        _ => {
            return Err(KvError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload.is_empty() { None } else { Some(payload) };

    Ok(Response { status, payload })
}

// =============================================================================
// Framing
// =============================================================================

fn frame(tag: u8, payload: &[u8]) -> Result<Vec<u8>> {
    check_payload_len(payload.len())?;

    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(tag);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    Ok(message.to_vec())
}

/// Reject payloads the peer's reader would refuse
pub fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE as usize {
        return Err(KvError::FrameTooLarge {
            len,
            max: MAX_PAYLOAD_SIZE as usize,
        });
    }
    Ok(())
}

/// Validate a complete frame and return its tag and payload
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(KvError::Protocol(format!(
            "Incomplete {}header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let tag = header.get_u8();
    let payload_len = checked_len(header.get_u32())?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(KvError::Protocol(format!(
            "Incomplete {}payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((tag, &bytes[HEADER_SIZE..total_len]))
}

fn checked_len(len: u32) -> Result<usize> {
    let len = len as usize;
    check_payload_len(len)?;
    Ok(len)
}

/// Read one raw frame (tag + payload) from a stream
///
/// Once this returns `Ok`, the stream is positioned at the next frame no
/// matter whether the payload turns out to be decodable.
fn read_frame<R: Read>(reader: &mut R) -> Result<(u8, Vec<u8>)> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let mut buf = &header[..];
    let tag = buf.get_u8();
    let payload_len = checked_len(buf.get_u32())?;

    // Sized by the bytes that arrive, not by the header
    let mut payload = Vec::new();
    (&mut *reader)
        .take(payload_len as u64)
        .read_to_end(&mut payload)?;
    if payload.len() < payload_len {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "frame payload truncated: expected {} bytes, got {}",
                payload_len,
                payload.len()
            ),
        )
        .into());
    }

    Ok((tag, payload))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs. A
/// `Protocol` error means the frame was consumed but could not be decoded.
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let (cmd_type, payload) = read_frame(reader)?;

    let cmd_type = CommandType::from_u8(cmd_type).ok_or_else(|| {
        KvError::Protocol(format!("Unknown command type: 0x{:02x}", cmd_type))
    })?;

    decode_payload(cmd_type, &payload)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let (status, payload) = read_frame(reader)?;
    build_response(status, payload)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
