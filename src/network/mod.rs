//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking accept, polls for shutdown)
//! - One thread per connection, strictly one command at a time
//! - Commands routed through the shared Dispatcher

mod server;
mod connection;
mod shutdown;

pub use server::Server;
pub use connection::Connection;
pub use shutdown::ShutdownSignal;
