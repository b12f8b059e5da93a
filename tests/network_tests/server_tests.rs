//! Tests for Server and Connection
//!
//! These tests verify:
//! - Serving requests over real TCP connections
//! - Connection limit enforcement
//! - Graceful shutdown of idle connections
//! - Config validation at bind time

use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bytes::Bytes;
use flintkv::network::{Server, ShutdownSignal};
use flintkv::protocol::{read_response, write_command, Command, Status};
use flintkv::{Config, FlintError, Store};

// =============================================================================
// Helper Functions
// =============================================================================

fn test_config() -> Config {
    Config::builder()
        .listen_addr("127.0.0.1:0")
        .idle_poll_ms(10)
        .read_timeout_ms(2000)
        .write_timeout_ms(2000)
        .build()
}

fn start_server(config: Config) -> (SocketAddr, ShutdownSignal, JoinHandle<flintkv::Result<()>>) {
    let server = Server::bind(config, Arc::new(Store::new())).unwrap();
    let addr = server.local_addr().unwrap();
    let shutdown = server.shutdown_handle();
    let handle = thread::spawn(move || server.run());
    (addr, shutdown, handle)
}

fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream
}

fn set(key: &str, value: &str) -> Command {
    Command::Set {
        flags: 0,
        expiration: 0,
        key: key.as_bytes().to_vec(),
        value: Bytes::copy_from_slice(value.as_bytes()),
    }
}

fn get(key: &str) -> Command {
    Command::Get {
        key: key.as_bytes().to_vec(),
        value: Bytes::new(),
    }
}

// =============================================================================
// Serving Tests
// =============================================================================

#[test]
fn test_serves_many_commands_on_one_connection() {
    let (addr, shutdown, handle) = start_server(test_config());
    let mut stream = connect(addr);

    for i in 0..20u32 {
        let key = format!("key{}", i);
        write_command(&mut stream, &set(&key, &format!("value{}", i)), i, 0).unwrap();
        let response = read_response(&mut stream).unwrap();
        assert_eq!(response.status(), Some(Status::NoError));
        assert_eq!(response.header.opaque, i);
    }

    for i in 0..20u32 {
        write_command(&mut stream, &get(&format!("key{}", i)), i, 0).unwrap();
        let response = read_response(&mut stream).unwrap();
        assert_eq!(response.value, Bytes::from(format!("value{}", i)));
    }

    shutdown.trigger();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_connections_share_store() {
    let (addr, shutdown, handle) = start_server(test_config());

    let mut writer = connect(addr);
    write_command(&mut writer, &set("shared", "hello"), 0, 0).unwrap();
    assert_eq!(read_response(&mut writer).unwrap().status(), Some(Status::NoError));

    let mut reader = connect(addr);
    write_command(&mut reader, &get("shared"), 0, 0).unwrap();
    let response = read_response(&mut reader).unwrap();
    assert_eq!(&response.value[..], b"hello");

    shutdown.trigger();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_bad_magic_closes_connection() {
    let (addr, shutdown, handle) = start_server(test_config());
    let mut stream = connect(addr);

    stream.write_all(&[0x00; 24]).unwrap();

    // No response, just a closed stream
    assert!(read_response(&mut stream).is_err());

    shutdown.trigger();
    handle.join().unwrap().unwrap();
}

// =============================================================================
// Connection Limit Tests
// =============================================================================

#[test]
fn test_connection_limit() {
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .idle_poll_ms(10)
        .max_connections(1)
        .build();
    let (addr, shutdown, handle) = start_server(config);

    let mut first = connect(addr);
    write_command(&mut first, &set("k", "v"), 0, 0).unwrap();
    assert_eq!(read_response(&mut first).unwrap().status(), Some(Status::NoError));

    let mut second = connect(addr);
    let _ = write_command(&mut second, &get("k"), 0, 0);
    assert!(read_response(&mut second).is_err());

    // The first connection is still served
    write_command(&mut first, &get("k"), 0, 0).unwrap();
    assert_eq!(read_response(&mut first).unwrap().status(), Some(Status::NoError));

    shutdown.trigger();
    handle.join().unwrap().unwrap();
}

// =============================================================================
// Shutdown Tests
// =============================================================================

#[test]
fn test_shutdown_closes_idle_connections() {
    let (addr, shutdown, handle) = start_server(test_config());

    let mut idle = connect(addr);
    write_command(&mut idle, &set("k", "v"), 0, 0).unwrap();
    read_response(&mut idle).unwrap();

    shutdown.trigger();
    handle.join().unwrap().unwrap();

    // Server side of the idle connection is gone
    let _ = write_command(&mut idle, &get("k"), 0, 0);
    assert!(read_response(&mut idle).is_err());
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_bind_rejects_invalid_config() {
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .max_connections(0)
        .build();

    let result = Server::bind(config, Arc::new(Store::new()));
    assert!(matches!(result, Err(FlintError::Config(_))));
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.listen_addr, "127.0.0.1:9090");
    assert_eq!(config.max_value_size, 1024 * 1024);
    assert!(config.validate().is_ok());
}
