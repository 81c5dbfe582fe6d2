//! CLI argument parsing

use bfd_core::{BfdState, Error, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bfdwire")]
#[command(version, about = "Decode and encode BFD control packets", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode and validate control packets
    Decode {
        /// Hex-encoded datagrams (whitespace and a leading 0x are ignored)
        #[arg(value_name = "HEX", required_unless_present = "file")]
        packets: Vec<String>,

        /// Read a single raw datagram from a file instead
        #[arg(short, long, conflicts_with = "packets")]
        file: Option<PathBuf>,

        /// Source endpoint to attach to decoded packets
        #[arg(short, long, default_value = "0.0.0.0:0")]
        source: SocketAddr,

        /// Decoder parameters (key=value pairs)
        #[arg(short = 'M', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Encode a control header and print it as hex
    Encode {
        /// My Discriminator (random when omitted)
        #[arg(long)]
        my_disc: Option<u32>,

        /// Your Discriminator
        #[arg(long, default_value = "0")]
        your_disc: u32,

        /// Session state (admindown, down, init, up)
        #[arg(long, default_value = "down")]
        state: BfdState,

        /// Diagnostic code (0-31)
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..32))]
        diag: u8,

        /// Detection time multiplier
        #[arg(long, default_value = "3")]
        detect_mult: u8,

        /// Desired Min TX Interval in microseconds
        #[arg(long, default_value = "1000000")]
        tx: u32,

        /// Required Min RX Interval in microseconds
        #[arg(long, default_value = "1000000")]
        rx: u32,

        /// Required Min Echo RX Interval in microseconds
        #[arg(long, default_value = "0")]
        echo_rx: u32,

        /// Set the Poll bit
        #[arg(long)]
        poll: bool,

        /// Set the Final bit
        #[arg(long = "final")]
        final_bit: bool,
    },
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Convert parameter strings (key=value) into a HashMap
pub fn parse_params(params: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| Error::invalid_parameter(param.as_str(), "expected KEY=VALUE"))?;
        map.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(map)
}
