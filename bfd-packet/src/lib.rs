//! BFD control packet codec
//!
//! This crate decodes and validates BFD control packets (RFC 5880) received
//! from the network, and encodes control headers for transmission.
//!
//! # Quick Start
//!
//! ```rust
//! use bfd_packet::{BfdControlPacket, ControlHeader};
//! use bfd_core::{BfdState, DecodeError};
//! use std::net::SocketAddr;
//!
//! let source: SocketAddr = "192.0.2.1:49152".parse().unwrap();
//!
//! let bytes = ControlHeader::new(0x11, 0).to_bytes();
//! let packet = BfdControlPacket::decode(&bytes, source).unwrap();
//! assert_eq!(packet.state(), BfdState::Down);
//!
//! // A peer in Up must know our discriminator
//! let bytes = ControlHeader::new(0x11, 0).with_state(BfdState::Up).to_bytes();
//! let err = BfdControlPacket::decode(&bytes, source).unwrap_err();
//! assert!(matches!(err, DecodeError::ZeroYourDiscriminator { .. }));
//! ```
//!
//! # Modules
//!
//! - [`packet`] - header layout, validation and encoding
//! - [`observer`] - hooks invoked while decoding
//! - [`decoder`] - configured decoder with statistics for receive loops
//! - [`config`] - optional validation rules
//! - [`stats`] - decode counters

pub mod config;
pub mod decoder;
pub mod observer;
pub mod packet;
pub mod stats;

pub use config::DecoderConfig;
pub use decoder::PacketDecoder;
pub use observer::{DecodeObserver, NoopObserver, TracingObserver};
pub use packet::{random_discriminator, BfdControlPacket, ControlHeader};
pub use stats::{DecodeStats, DecodeStatsCounters};
