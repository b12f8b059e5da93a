//! Fixed 24-byte request and response headers.
//!
//! Both directions share one layout; only the magic byte and the meaning
//! of bytes 6..8 differ (reserved in requests, status in responses).

use bytes::{Buf, BufMut};

use crate::error::{FlintError, Result};

/// Magic byte for request packets.
pub const REQUEST_MAGIC: u8 = 0x80;

/// Magic byte for response packets.
pub const RESPONSE_MAGIC: u8 = 0x81;

/// Size of every request and response header.
pub const HEADER_SIZE: usize = 24;

/// Supported opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Get = 0x00,
    Set = 0x01,
}

impl Opcode {
    /// Try to convert a byte to a supported opcode.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Opcode::Get),
            0x01 => Some(Opcode::Set),
            _ => None,
        }
    }
}

/// Request header as sent by clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestHeader {
    pub magic: u8,
    pub opcode: u8,
    pub key_len: u16,
    pub extras_len: u8,
    pub data_type: u8,
    pub reserved: u16,
    pub body_len: u32,
    /// Echoed verbatim in the response
    pub opaque: u32,
    /// 0 disables the CAS check
    pub cas: u64,
}

impl RequestHeader {
    /// Create an empty header for the given opcode.
    pub fn new(opcode: Opcode) -> Self {
        Self {
            magic: REQUEST_MAGIC,
            opcode: opcode as u8,
            ..Self::default()
        }
    }

    /// Decode a header from its 24 wire bytes.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let mut buf = &bytes[..];

        let header = Self {
            magic: buf.get_u8(),
            opcode: buf.get_u8(),
            key_len: buf.get_u16(),
            extras_len: buf.get_u8(),
            data_type: buf.get_u8(),
            reserved: buf.get_u16(),
            body_len: buf.get_u32(),
            opaque: buf.get_u32(),
            cas: buf.get_u64(),
        };

        if header.magic != REQUEST_MAGIC {
            return Err(FlintError::Protocol(format!(
                "Bad request magic: 0x{:02x}",
                header.magic
            )));
        }

        Ok(header)
    }

    /// Append the 24 wire bytes of this header to `buf`.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.magic);
        buf.put_u8(self.opcode);
        buf.put_u16(self.key_len);
        buf.put_u8(self.extras_len);
        buf.put_u8(self.data_type);
        buf.put_u16(self.reserved);
        buf.put_u32(self.body_len);
        buf.put_u32(self.opaque);
        buf.put_u64(self.cas);
    }

    /// Length of the value segment, derived from the other lengths.
    ///
    /// Fails when the key and extras claim more bytes than the body holds.
    pub fn value_len(&self) -> Result<usize> {
        value_len(self.body_len, self.key_len, self.extras_len)
    }
}

/// Response header as written back to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseHeader {
    pub magic: u8,
    pub opcode: u8,
    pub key_len: u16,
    pub extras_len: u8,
    pub data_type: u8,
    pub status: u16,
    pub body_len: u32,
    pub opaque: u32,
    pub cas: u64,
}

impl ResponseHeader {
    /// Decode a header from its 24 wire bytes.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let mut buf = &bytes[..];

        let header = Self {
            magic: buf.get_u8(),
            opcode: buf.get_u8(),
            key_len: buf.get_u16(),
            extras_len: buf.get_u8(),
            data_type: buf.get_u8(),
            status: buf.get_u16(),
            body_len: buf.get_u32(),
            opaque: buf.get_u32(),
            cas: buf.get_u64(),
        };

        if header.magic != RESPONSE_MAGIC {
            return Err(FlintError::Protocol(format!(
                "Bad response magic: 0x{:02x}",
                header.magic
            )));
        }

        Ok(header)
    }

    /// Append the 24 wire bytes of this header to `buf`.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.magic);
        buf.put_u8(self.opcode);
        buf.put_u16(self.key_len);
        buf.put_u8(self.extras_len);
        buf.put_u8(self.data_type);
        buf.put_u16(self.status);
        buf.put_u32(self.body_len);
        buf.put_u32(self.opaque);
        buf.put_u64(self.cas);
    }

    /// Length of the value segment, derived from the other lengths.
    pub fn value_len(&self) -> Result<usize> {
        value_len(self.body_len, self.key_len, self.extras_len)
    }
}

fn value_len(body_len: u32, key_len: u16, extras_len: u8) -> Result<usize> {
    let framed = key_len as u32 + extras_len as u32;
    body_len
        .checked_sub(framed)
        .map(|len| len as usize)
        .ok_or_else(|| {
            FlintError::Protocol(format!(
                "Body length {} shorter than key ({}) plus extras ({})",
                body_len, key_len, extras_len
            ))
        })
}
