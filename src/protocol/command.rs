//! Command definitions
//!
//! One variant per supported opcode, each carrying its decoded body fields.

use std::io::Read;

use bytes::{Buf, Bytes};

use crate::error::{FlintError, Result};
use super::codec::read_segment;
use super::header::{Opcode, RequestHeader};

/// A decoded command body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up a key
    Get {
        key: Vec<u8>,
        /// Body bytes after the key; must be empty for a well-formed Get
        value: Bytes,
    },

    /// Insert or update a key, optionally CAS-checked via the header
    Set {
        flags: u32,
        expiration: u32,
        key: Vec<u8>,
        value: Bytes,
    },
}

impl Command {
    /// Decode the body that follows `header`.
    ///
    /// Consumes exactly `header.body_len` bytes. Extras beyond the fields a
    /// command understands are read and dropped.
    pub fn decode_body<R: Read>(
        reader: &mut R,
        header: &RequestHeader,
        opcode: Opcode,
    ) -> Result<Command> {
        let value_len = header.value_len()?;

        let extras = read_segment(reader, header.extras_len as usize)?;
        let key = read_segment(reader, header.key_len as usize)?;
        let value = Bytes::from(read_segment(reader, value_len)?);

        let command = match opcode {
            Opcode::Get => Command::Get { key, value },
            Opcode::Set => {
                let mut extras = &extras[..];
                let flags = if extras.remaining() >= 4 { extras.get_u32() } else { 0 };
                let expiration = if extras.remaining() >= 4 { extras.get_u32() } else { 0 };
                Command::Set {
                    flags,
                    expiration,
                    key,
                    value,
                }
            }
        };

        Ok(command)
    }

    /// Check protocol conventions that the wire format alone cannot enforce.
    pub fn validate(&self, header: &RequestHeader) -> Result<()> {
        let invalid = |reason: &str| -> Result<()> {
            Err(FlintError::InvalidRequest(reason.to_string()))
        };

        match self {
            Command::Get { key, value } => {
                if header.extras_len > 0 {
                    return invalid("get must not carry extras");
                }
                if header.key_len == 0 || key.is_empty() {
                    return invalid("missing key");
                }
                if !value.is_empty() {
                    return invalid("get must not carry a value");
                }
            }
            Command::Set { key, value, .. } => {
                if header.extras_len == 0 {
                    return invalid("set requires extras");
                }
                if header.extras_len != 4 && header.extras_len != 8 {
                    return invalid("set extras must be flags or flags and expiration");
                }
                if header.key_len == 0 || key.is_empty() {
                    return invalid("missing key");
                }
                if value.is_empty() {
                    return invalid("missing value");
                }
            }
        }

        Ok(())
    }

    /// Get the opcode for this command
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Get { .. } => Opcode::Get,
            Command::Set { .. } => Opcode::Set,
        }
    }

    /// Get the key this command operates on
    pub fn key(&self) -> &[u8] {
        match self {
            Command::Get { key, .. } | Command::Set { key, .. } => key,
        }
    }
}
