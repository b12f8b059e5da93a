//! FlintKV CLI Client
//!
//! Command-line interface for interacting with a FlintKV server.

use std::net::TcpStream;
use std::process::ExitCode;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use flintkv::protocol::{read_response, write_command, Command, Response};
use flintkv::Result;

/// FlintKV CLI
#[derive(Parser, Debug)]
#[command(name = "flintkv-cli")]
#[command(about = "CLI for the FlintKV key-value server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = flintkv::config::DEFAULT_LISTEN_ADDR)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Opaque client flags stored with the value
        #[arg(long, default_value = "0")]
        flags: u32,

        /// Expiration marker stored with the value
        #[arg(long, default_value = "0")]
        expiry: u32,

        /// Only update if the item's current CAS matches (0 = unconditional)
        #[arg(long, default_value = "0")]
        cas: u64,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(response) if response.status().is_some_and(|s| s.is_success()) => {
            print_response(&response);
            ExitCode::SUCCESS
        }
        Ok(response) => {
            print_response(&response);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Send one command and wait for its response
fn run(args: Args) -> Result<Response> {
    let (command, cas) = match args.command {
        Commands::Get { key } => (
            Command::Get {
                key: key.into_bytes(),
                value: Bytes::new(),
            },
            0,
        ),
        Commands::Set {
            key,
            value,
            flags,
            expiry,
            cas,
        } => (
            Command::Set {
                flags,
                expiration: expiry,
                key: key.into_bytes(),
                value: Bytes::from(value),
            },
            cas,
        ),
    };

    let mut stream = TcpStream::connect(&args.server)?;
    write_command(&mut stream, &command, 0, cas)?;
    read_response(&mut stream)
}

fn print_response(response: &Response) {
    let status = response
        .status()
        .map(|s| s.as_str())
        .unwrap_or("Unknown status");

    println!("status: {} (0x{:04x})", status, response.header.status);
    println!("cas:    {}", response.header.cas);
    if let Some(flags) = response.flags() {
        println!("flags:  {}", flags);
    }
    if !response.value.is_empty() {
        println!("value:  {}", String::from_utf8_lossy(&response.value));
    }
}
