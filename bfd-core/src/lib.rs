//! BFD Core Library
//!
//! This crate provides the error taxonomy, protocol enums and constants
//! shared by the BFD control packet codec and its command-line front-end.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{DecodeError, Error, Result};
pub use types::*;
