//! Dispatcher Module
//!
//! Runs one request through its stages and writes the response.
//!
//! ## Stages
//! ```text
//! HeaderRead → OpcodeResolved → BodyDecoded → Validated → Executed → ResponseSent
//! ```
//!
//! Stages run strictly in order. Any I/O or decode failure aborts the
//! request with an error and the caller closes the connection. Every other
//! failure is turned into a response status and the connection stays usable.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::error::{FlintError, Result};
use crate::protocol::{
    read_header, skip_body, write_response, Command, Opcode, RequestHeader, Response, Status,
};
use crate::store::Store;

/// Executes protocol commands against a shared store
///
/// One dispatcher is shared by every connection of a server. It holds no
/// per-connection state, so `handle_command` may run on many threads at once.
pub struct Dispatcher {
    store: Arc<Store>,

    /// Largest value segment accepted in a request
    max_value_size: usize,
}

impl Dispatcher {
    /// Create a dispatcher over `store`
    pub fn new(store: Arc<Store>, max_value_size: usize) -> Self {
        Self {
            store,
            max_value_size,
        }
    }

    /// Read one request from `reader` and write its response to `writer`
    ///
    /// Returns `Err` only when the connection must be closed.
    pub fn handle_command<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> Result<()> {
        let header = read_header(reader)?;

        let mut response = match self.process(reader, &header) {
            Ok(response) => response,
            Err(e) => match Response::from_error(&e) {
                Some(response) => {
                    tracing::debug!(opcode = header.opcode, opaque = header.opaque, "{}", e);
                    response
                }
                None => return Err(e),
            },
        };

        response.fill_header(&header)?;
        write_response(writer, &response)
    }

    /// Resolve, decode, validate and execute the request after `header`
    fn process<R: Read>(&self, reader: &mut R, header: &RequestHeader) -> Result<Response> {
        let value_len = header.value_len()?;

        let opcode = match Opcode::from_u8(header.opcode) {
            Some(opcode) => opcode,
            None => {
                skip_body(reader, header)?;
                return Err(FlintError::UnsupportedCommand(header.opcode));
            }
        };

        if opcode == Opcode::Set && value_len > self.max_value_size {
            skip_body(reader, header)?;
            return Err(FlintError::ValueTooLarge {
                size: value_len,
                max: self.max_value_size,
            });
        }

        let command = Command::decode_body(reader, header, opcode)?;
        command.validate(header)?;

        tracing::trace!(
            opcode = ?command.opcode(),
            key = %String::from_utf8_lossy(command.key()),
            cas = header.cas,
            "Executing command"
        );

        self.execute(header, command)
    }

    /// Execute a validated command against the store
    ///
    /// Store failures come back as `Err` and are reported through the
    /// response status by the caller.
    pub fn execute(&self, header: &RequestHeader, command: Command) -> Result<Response> {
        match command {
            Command::Get { key, .. } => {
                let item = self.store.get(&key).ok_or(FlintError::KeyNotFound)?;
                Ok(Response::new(Status::NoError)
                    .with_flags(item.flags)
                    .with_value(item.value)
                    .with_cas(item.cas))
            }
            Command::Set {
                flags,
                expiration,
                key,
                value,
            } => {
                let cas = self
                    .store
                    .set(&key, value, flags, expiration, header.cas)?;
                Ok(Response::new(Status::NoError).with_cas(cas))
            }
        }
    }

    /// Get the shared store
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }
}
