//! Response definitions
//!
//! Represents responses to clients.

use bytes::{BufMut, Bytes};

use crate::error::{FlintError, Result};
use super::header::{RequestHeader, ResponseHeader, HEADER_SIZE, RESPONSE_MAGIC};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Status {
    NoError = 0x0000,
    KeyNotFound = 0x0001,
    KeyExists = 0x0002,
    ValueTooLarge = 0x0003,
    InvalidArgs = 0x0004,
    ItemNotStored = 0x0005,
    InvalidOp = 0x0006,
    UnknownCommand = 0x0081,
    OutOfMemory = 0x0082,
}

impl Status {
    /// Try to convert a u16 to a status.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0000 => Some(Status::NoError),
            0x0001 => Some(Status::KeyNotFound),
            0x0002 => Some(Status::KeyExists),
            0x0003 => Some(Status::ValueTooLarge),
            0x0004 => Some(Status::InvalidArgs),
            0x0005 => Some(Status::ItemNotStored),
            0x0006 => Some(Status::InvalidOp),
            0x0081 => Some(Status::UnknownCommand),
            0x0082 => Some(Status::OutOfMemory),
            _ => None,
        }
    }

    /// Returns true if this status indicates success.
    pub fn is_success(&self) -> bool {
        *self == Status::NoError
    }

    /// Returns the status as a short description.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NoError => "No error",
            Status::KeyNotFound => "Key not found",
            Status::KeyExists => "Key exists",
            Status::ValueTooLarge => "Value too large",
            Status::InvalidArgs => "Invalid arguments",
            Status::ItemNotStored => "Item not stored",
            Status::InvalidOp => "Invalid operation",
            Status::UnknownCommand => "Unknown command",
            Status::OutOfMemory => "Out of memory",
        }
    }
}

/// A response to send to a client
///
/// Segments left empty are not written to the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub header: ResponseHeader,
    pub extras: Vec<u8>,
    pub key: Vec<u8>,
    pub value: Bytes,
}

impl Response {
    /// Create a response with the given status and an empty body
    pub fn new(status: Status) -> Self {
        let mut response = Self::default();
        response.header.status = status as u16;
        response
    }

    /// Create a response reporting a non-fatal error.
    ///
    /// Misses and CAS conflicts carry no body; the remaining errors carry
    /// their message as the value. Returns `None` for fatal errors.
    pub fn from_error(err: &FlintError) -> Option<Self> {
        let status = err.status()?;
        let response = Self::new(status);
        match status {
            Status::KeyNotFound | Status::KeyExists => Some(response),
            _ => Some(response.with_value(Bytes::from(err.to_string()))),
        }
    }

    /// Attach client flags as the 4-byte extras segment
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.extras = flags.to_be_bytes().to_vec();
        self
    }

    pub fn with_value(mut self, value: Bytes) -> Self {
        self.value = value;
        self
    }

    pub fn with_cas(mut self, cas: u64) -> Self {
        self.header.cas = cas;
        self
    }

    /// Decoded status, or `None` if the code is not one we know
    pub fn status(&self) -> Option<Status> {
        Status::from_u16(self.header.status)
    }

    /// Flags from the extras segment, if present
    pub fn flags(&self) -> Option<u32> {
        let bytes: [u8; 4] = self.extras.get(..4)?.try_into().ok()?;
        Some(u32::from_be_bytes(bytes))
    }

    /// Complete the header from the finalized segments and the request
    /// being answered.
    pub fn fill_header(&mut self, request: &RequestHeader) -> Result<()> {
        let key_len = u16::try_from(self.key.len()).map_err(|_| {
            FlintError::Protocol(format!("Response key too long: {} bytes", self.key.len()))
        })?;
        let extras_len = u8::try_from(self.extras.len()).map_err(|_| {
            FlintError::Protocol(format!(
                "Response extras too long: {} bytes",
                self.extras.len()
            ))
        })?;
        let body_len = self.extras.len() + self.key.len() + self.value.len();
        let body_len = u32::try_from(body_len).map_err(|_| {
            FlintError::Protocol(format!("Response body too long: {} bytes", body_len))
        })?;

        let header = &mut self.header;
        header.magic = RESPONSE_MAGIC;
        header.opcode = request.opcode;
        header.opaque = request.opaque;
        header.key_len = key_len;
        header.extras_len = extras_len;
        header.body_len = body_len;

        Ok(())
    }

    /// Total encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.extras.len() + self.key.len() + self.value.len()
    }

    /// Append the header and every non-empty segment to `buf`
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        self.header.encode(buf);

        if !self.extras.is_empty() {
            buf.put_slice(&self.extras);
        }
        if !self.key.is_empty() {
            buf.put_slice(&self.key);
        }
        if !self.value.is_empty() {
            buf.put_slice(&self.value);
        }
    }
}
