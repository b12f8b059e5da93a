//! # FlintKV
//!
//! An in-memory key-value server speaking the memcached binary protocol:
//! - Fixed 24-byte big-endian headers with framed extras/key/value bodies
//! - Get and Set, with compare-and-swap (CAS) checked updates
//! - Reader/writer locked table shared by all connections
//! - One thread per connection, strict request/response lockstep
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (one thread per connection)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ byte stream
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Dispatcher                               │
//! │   header → opcode → body → validate → execute → respond      │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │    Protocol     │                │      Store      │
//!   │ (header/codec)  │                │ (RwLock + CAS)  │
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod store;
pub mod dispatcher;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlintError, Result};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use store::{Item, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of FlintKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
