//! Protocol Module
//!
//! Memcached-compatible binary protocol.
//!
//! ## Header Format (24 bytes, big-endian)
//! ```text
//! offset 0:  magic(1) opcode(1) key_len(2)
//! offset 4:  extras_len(1) data_type(1) reserved/status(2)
//! offset 8:  body_len(4)
//! offset 12: opaque(4)
//! offset 16: cas(8)
//! ```
//!
//! ### Commands
//! - 0x00: GET - Body: key
//! - 0x01: SET - Body: extras (flags (4) + expiration (4)) + key + value
//!
//! ### Status Codes
//! - 0x0000: NO_ERROR
//! - 0x0001: KEY_NOT_FOUND
//! - 0x0002: KEY_EXISTS
//! - 0x0003: VALUE_TOO_LARGE
//! - 0x0004: INVALID_ARGS
//! - 0x0005: ITEM_NOT_STORED
//! - 0x0006: INVALID_OP
//! - 0x0081: UNKNOWN_COMMAND
//! - 0x0082: OUT_OF_MEMORY

mod header;
mod command;
mod response;
mod codec;

pub use header::{
    Opcode, RequestHeader, ResponseHeader, HEADER_SIZE, REQUEST_MAGIC, RESPONSE_MAGIC,
};
pub use command::Command;
pub use response::{Response, Status};
pub use codec::{
    encode_command, read_header, read_response, read_segment, skip_body, write_command,
    write_response,
};
