//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: HELLOWORLD   - Payload: name
//! - 0x02: ADD          - Payload: key_len (4) + key + value
//! - 0x03: SELECT       - Payload: key_len (4) + key
//! - 0x04: REMOVE       - Payload: key_len (4) + key
//! - 0x05: SELECT_RANGE - Payload: start_len (4) + start + end
//! - 0x06: REMOVE_RANGE - Payload: start_len (4) + start + end
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK        (value, greeting, bincode pair list, or empty ack)
//! - 0x01: NOT_FOUND (SELECT miss)
//! - 0x02: ERROR     (payload is a UTF-8 message)

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{
    check_payload_len, decode_command, decode_response, encode_command, encode_response,
    read_command, read_response, write_command, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use response::encoded_pairs_len;
