//! Protocol codec
//!
//! Stream-level reading and writing of requests and responses.
//!
//! ## Wire Format
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Header (24)                                 │
//! ├───────────────┬───────────────┬─────────────┤
//! │ Extras (ext)  │ Key (key_len) │ Value (rest)│
//! └───────────────┴───────────────┴─────────────┘
//! rest = body_len - key_len - extras_len
//! ```
//!
//! Server side: [`read_header`], [`read_segment`], [`skip_body`],
//! [`write_response`]. Client side: [`encode_command`], [`write_command`],
//! [`read_response`].

use std::io::{self, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FlintError, Result};
use super::header::{RequestHeader, ResponseHeader, HEADER_SIZE};
use super::{Command, Response};

// =============================================================================
// Server side
// =============================================================================

/// Read one 24-byte request header
///
/// A short read surfaces as `FlintError::Io` with `UnexpectedEof`.
pub fn read_header<R: Read>(reader: &mut R) -> Result<RequestHeader> {
    let mut bytes = [0u8; HEADER_SIZE];
    reader.read_exact(&mut bytes)?;
    RequestHeader::decode(&bytes)
}

/// Read exactly `len` bytes
pub fn read_segment<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut segment = vec![0u8; len];
    if len > 0 {
        reader.read_exact(&mut segment)?;
    }
    Ok(segment)
}

/// Discard the whole body announced by `header` without buffering it
pub fn skip_body<R: Read>(reader: &mut R, header: &RequestHeader) -> Result<()> {
    let expected = header.body_len as u64;
    let skipped = io::copy(&mut reader.take(expected), &mut io::sink())?;
    if skipped < expected {
        return Err(FlintError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("body truncated: expected {} bytes, got {}", expected, skipped),
        )));
    }
    Ok(())
}

/// Write a response to a stream and flush it
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let mut buf = BytesMut::with_capacity(response.encoded_len());
    response.encode(&mut buf);
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Client side
// =============================================================================

/// Encode a command as a complete request
///
/// Set always sends both flags and expiration (8 bytes of extras).
pub fn encode_command(command: &Command, opaque: u32, cas: u64) -> Result<Vec<u8>> {
    let mut extras = BytesMut::new();
    let (key, value) = match command {
        Command::Get { key, value } => (key.as_slice(), &value[..]),
        Command::Set {
            flags,
            expiration,
            key,
            value,
        } => {
            extras.put_u32(*flags);
            extras.put_u32(*expiration);
            (key.as_slice(), &value[..])
        }
    };

    let key_len = u16::try_from(key.len())
        .map_err(|_| FlintError::Protocol(format!("Key too long: {} bytes", key.len())))?;
    let body_len = u32::try_from(extras.len() + key.len() + value.len())
        .map_err(|_| FlintError::Protocol("Body too long".to_string()))?;

    let mut header = RequestHeader::new(command.opcode());
    header.key_len = key_len;
    header.extras_len = extras.len() as u8;
    header.body_len = body_len;
    header.opaque = opaque;
    header.cas = cas;

    let mut message = BytesMut::with_capacity(HEADER_SIZE + body_len as usize);
    header.encode(&mut message);
    message.put_slice(&extras);
    message.put_slice(key);
    message.put_slice(value);

    Ok(message.to_vec())
}

/// Write a command to a stream and flush it
pub fn write_command<W: Write>(
    writer: &mut W,
    command: &Command,
    opaque: u32,
    cas: u64,
) -> Result<()> {
    let bytes = encode_command(command, opaque, cas)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let mut bytes = [0u8; HEADER_SIZE];
    reader.read_exact(&mut bytes)?;
    let header = ResponseHeader::decode(&bytes)?;
    let value_len = header.value_len()?;

    let extras = read_segment(reader, header.extras_len as usize)?;
    let key = read_segment(reader, header.key_len as usize)?;
    let value = Bytes::from(read_segment(reader, value_len)?);

    Ok(Response {
        header,
        extras,
        key,
        value,
    })
}
