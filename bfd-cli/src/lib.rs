//! CLI interface for the BFD codec
//!
//! This crate provides the `bfdwire` command-line front-end: argument
//! parsing and the decode/encode subcommands.

pub mod args;
pub mod commands;

pub use args::{parse_params, Cli, Commands};
pub use commands::{
    decode_exit_code, decode_exit_status, format_packet, log_level, parse_hex, run_decode,
    run_encode, EncodeOptions,
};
