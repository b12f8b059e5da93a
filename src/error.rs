//! Error types for FlintKV
//!
//! Provides a unified error type for all operations.
//!
//! Errors fall into two groups:
//! - **Fatal**: I/O and decode failures. The connection cannot be trusted
//!   to be in sync any more and is closed.
//! - **Reportable**: validation and store failures. They become a response
//!   status and the connection stays open.

use thiserror::Error;

use crate::protocol::Status;

/// Result type alias using FlintError
pub type Result<T> = std::result::Result<T, FlintError>;

/// Unified error type for FlintKV operations
#[derive(Debug, Error)]
pub enum FlintError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unsupported command: opcode 0x{0:02x}")]
    UnsupportedCommand(u8),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Value too large: {size} bytes (max {max})")]
    ValueTooLarge { size: usize, max: usize },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    #[error("CAS mismatch")]
    CasMismatch,

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FlintError {
    /// Returns true if the error must terminate the connection.
    pub fn is_fatal(&self) -> bool {
        self.status().is_none()
    }

    /// Wire status for errors that are reported to the client.
    ///
    /// Returns `None` for fatal errors, which never reach the wire.
    pub fn status(&self) -> Option<Status> {
        match self {
            FlintError::UnsupportedCommand(_) => Some(Status::UnknownCommand),
            FlintError::InvalidRequest(_) => Some(Status::InvalidArgs),
            FlintError::ValueTooLarge { .. } => Some(Status::ValueTooLarge),
            FlintError::KeyNotFound => Some(Status::KeyNotFound),
            FlintError::CasMismatch => Some(Status::KeyExists),
            FlintError::Io(_)
            | FlintError::Protocol(_)
            | FlintError::Network(_)
            | FlintError::Config(_) => None,
        }
    }
}
