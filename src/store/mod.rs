//! Store Module
//!
//! In-memory key-value table shared by every connection.
//!
//! ## Responsibilities
//! - Map keys to versioned items
//! - Many concurrent readers, one writer at a time
//! - CAS-checked updates (optimistic concurrency)
//!
//! ## Data Structure Choice
//! A `HashMap` behind a single `parking_lot::RwLock`:
//! - Key order is irrelevant to the protocol
//! - One lock keeps the CAS check and the mutation in a single critical
//!   section

mod table;

pub use table::Store;

use bytes::Bytes;

/// Entry stored in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Opaque value bytes
    pub value: Bytes,

    /// Client metadata, stored and returned untouched
    pub flags: u32,

    /// Expiration marker. Stored only, never enforced.
    pub expiry: u32,

    /// Version counter. 1 on insert, +1 on every successful update.
    pub cas: u64,
}

impl Item {
    /// Create a freshly inserted item
    pub fn new(value: Bytes, flags: u32, expiry: u32) -> Self {
        Self {
            value,
            flags,
            expiry,
            cas: 1,
        }
    }
}
