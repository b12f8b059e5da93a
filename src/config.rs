//! Configuration for FlintKV
//!
//! Centralized configuration with sensible defaults.

use crate::error::{FlintError, Result};

/// Default TCP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:9090";

/// Main configuration for a FlintKV server instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Read deadline for an in-flight command (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Write deadline for a response (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    /// How often idle connections and the accept loop check for shutdown
    /// (milliseconds)
    pub idle_poll_ms: u64,

    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Largest value a Set may store (in bytes)
    pub max_value_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            idle_poll_ms: 100,
            max_value_size: 1024 * 1024, // 1 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config can be used to run a server
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(FlintError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.idle_poll_ms == 0 {
            return Err(FlintError::Config(
                "idle_poll_ms must be at least 1".to_string(),
            ));
        }
        if self.max_value_size == 0 {
            return Err(FlintError::Config(
                "max_value_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the shutdown poll interval (in milliseconds)
    pub fn idle_poll_ms(mut self, ms: u64) -> Self {
        self.config.idle_poll_ms = ms;
        self
    }

    /// Set the maximum value size (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
