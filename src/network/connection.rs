//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{self, BufRead, BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatcher::Dispatcher;
use crate::error::{FlintError, Result};

use super::ShutdownSignal;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared command dispatcher
    dispatcher: Arc<Dispatcher>,

    /// Checked between commands
    shutdown: ShutdownSignal,

    /// Read deadline once a request has started arriving
    read_timeout: Option<Duration>,

    /// Read timeout used while idle, so the shutdown signal gets polled
    idle_poll: Duration,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O and disables Nagle's algorithm
    pub fn new(
        stream: TcpStream,
        dispatcher: Arc<Dispatcher>,
        shutdown: ShutdownSignal,
    ) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            dispatcher,
            shutdown,
            read_timeout: None,
            idle_poll: Duration::from_millis(100),
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 disables a timeout)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        self.read_timeout = (read_ms > 0).then(|| Duration::from_millis(read_ms));

        let write_stream = self.writer.get_ref();
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Configure how often an idle connection checks for shutdown
    pub fn set_idle_poll_ms(&mut self, ms: u64) -> Result<()> {
        if ms == 0 {
            return Err(FlintError::Config(
                "idle poll interval must be at least 1 ms".to_string(),
            ));
        }
        self.idle_poll = Duration::from_millis(ms);
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Serves one command at a time: a response is flushed before the next
    /// request is read. Returns when the client disconnects, shutdown is
    /// requested between commands, or a fatal error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            if !self.wait_for_request()? {
                return Ok(());
            }

            if let Err(e) = self
                .dispatcher
                .handle_command(&mut self.reader, &mut self.writer)
            {
                if let FlintError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected mid-command: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Closing connection from {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Block until the first byte of the next request is buffered
    ///
    /// Returns false when the client closed the connection or shutdown was
    /// requested.
    fn wait_for_request(&mut self) -> Result<bool> {
        self.reader
            .get_ref()
            .set_read_timeout(Some(self.idle_poll))?;

        loop {
            if self.shutdown.is_triggered() {
                tracing::debug!("Shutdown requested, closing {}", self.peer_addr);
                return Ok(false);
            }

            match self.reader.fill_buf().map(|buf| !buf.is_empty()) {
                Ok(true) => break,
                Ok(false) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(false);
                }
                Err(e) if is_idle_timeout(e.kind()) => continue,
                Err(e) if is_disconnect(e.kind()) => {
                    tracing::debug!("Connection from {} closed: {}", self.peer_addr, e);
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.reader.get_ref().set_read_timeout(self.read_timeout)?;
        Ok(true)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

// Windows reports an expired read timeout as TimedOut instead of WouldBlock.
fn is_idle_timeout(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

fn is_disconnect(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}
