//! TCP Server
//!
//! Accepts connections and runs each one on its own thread.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{FlintError, Result};
use crate::store::Store;

use super::{Connection, ShutdownSignal};

/// TCP server for FlintKV
pub struct Server {
    config: Config,

    /// Non-blocking listener, so the accept loop can poll for shutdown
    listener: TcpListener,

    dispatcher: Arc<Dispatcher>,

    shutdown: ShutdownSignal,

    /// Connections currently being served
    active_connections: Arc<AtomicUsize>,
}

impl Server {
    /// Bind a server on `config.listen_addr` serving `store`
    pub fn bind(config: Config, store: Arc<Store>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            FlintError::Network(format!("Failed to bind {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        let dispatcher = Arc::new(Dispatcher::new(store, config.max_value_size));

        Ok(Self {
            config,
            listener,
            dispatcher,
            shutdown: ShutdownSignal::new(),
            active_connections: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that stops the server when triggered
    pub fn shutdown_handle(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::Acquire)
    }

    /// Start the server (blocking)
    ///
    /// Returns once shutdown has been requested and every connection thread
    /// has finished its current command and exited.
    pub fn run(&self) -> Result<()> {
        let poll = Duration::from_millis(self.config.idle_poll_ms);
        let connections = WaitGroup::new();

        tracing::info!("Listening on {}", self.local_addr()?);

        while !self.shutdown.is_triggered() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = self.spawn_connection(stream, peer, connections.clone()) {
                        tracing::warn!("Failed to start connection from {}: {}", peer, e);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => thread::sleep(poll),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!("Error accepting connection: {}", e);
                    thread::sleep(poll);
                }
            }
        }

        tracing::info!(
            "Shutting down, waiting for {} connection(s)",
            self.active_connections()
        );
        connections.wait();

        Ok(())
    }

    /// Start a thread serving `stream`
    fn spawn_connection(
        &self,
        stream: TcpStream,
        peer: SocketAddr,
        connections: WaitGroup,
    ) -> Result<()> {
        if self.active_connections() >= self.config.max_connections {
            tracing::warn!(
                "Rejecting {}: connection limit {} reached",
                peer,
                self.config.max_connections
            );
            return Ok(());
        }

        stream.set_nonblocking(false)?;

        let mut connection = Connection::new(
            stream,
            Arc::clone(&self.dispatcher),
            self.shutdown.clone(),
        )?;
        connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;
        connection.set_idle_poll_ms(self.config.idle_poll_ms)?;

        let active = Arc::clone(&self.active_connections);
        active.fetch_add(1, Ordering::AcqRel);

        let spawned = thread::Builder::new()
            .name(format!("flintkv-conn-{}", peer))
            .spawn(move || {
                if let Err(e) = connection.handle() {
                    tracing::debug!("Connection from {} ended with error: {}", peer, e);
                }
                active.fetch_sub(1, Ordering::AcqRel);
                drop(connections);
            });

        if let Err(e) = spawned {
            self.active_connections.fetch_sub(1, Ordering::AcqRel);
            return Err(e.into());
        }

        Ok(())
    }
}
