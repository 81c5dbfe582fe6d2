//! Error types for the BFD workspace

use thiserror::Error;

/// Result type alias for BFD operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a received datagram is not a valid BFD control packet.
///
/// Each variant corresponds to exactly one validation rule and carries a
/// fixed reason string. Variants are checked in declaration order (with the
/// exception of [`DecodeError::ZeroDetectMult`], which is opt-in) and the
/// first violation wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeError {
    /// Fewer bytes than the fixed control header
    #[error("packet size below minimum correct value")]
    BelowMinimumSize { received: usize, minimum: usize },

    /// Version field is not 1
    #[error("unsupported protocol version")]
    UnsupportedVersion { version: u8 },

    /// Authentication bit set but no room for the authentication section
    #[error("packet size below minimum correct value")]
    BelowAuthenticatedMinimum { received: usize, minimum: usize },

    /// Length field claims more bytes than were received
    #[error("packet length field larger than received data")]
    LengthExceedsReceived { claimed: u8, received: usize },

    /// Multipoint bit set
    #[error("multipoint bit should be 0")]
    MultipointSet,

    /// My Discriminator is zero
    #[error("discriminator field is zero")]
    ZeroMyDiscriminator,

    /// Your Discriminator is zero while the sender is Init or Up
    #[error("your discriminator can't be zero in this state")]
    ZeroYourDiscriminator { state: u8 },

    /// Detect Mult is zero (only reported when the decoder is configured to)
    #[error("detect multiplier field is zero")]
    ZeroDetectMult,
}

impl DecodeError {
    /// Short machine-friendly label, used for statistics and log fields
    pub fn kind(&self) -> &'static str {
        Self::KINDS[self.index()]
    }

    /// Every variant, in validation order
    pub const KINDS: [&'static str; 8] = [
        "below_minimum_size",
        "unsupported_version",
        "below_authenticated_minimum",
        "length_exceeds_received",
        "multipoint_set",
        "zero_my_discriminator",
        "zero_your_discriminator",
        "zero_detect_mult",
    ];

    /// Position of this variant in [`DecodeError::KINDS`]
    pub fn index(&self) -> usize {
        match self {
            DecodeError::BelowMinimumSize { .. } => 0,
            DecodeError::UnsupportedVersion { .. } => 1,
            DecodeError::BelowAuthenticatedMinimum { .. } => 2,
            DecodeError::LengthExceedsReceived { .. } => 3,
            DecodeError::MultipointSet => 4,
            DecodeError::ZeroMyDiscriminator => 5,
            DecodeError::ZeroYourDiscriminator { .. } => 6,
            DecodeError::ZeroDetectMult => 7,
        }
    }
}

/// Main error type for the BFD tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Datagram rejected by the control packet validator
    #[error("BFD decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Hex input could not be parsed
    #[error("Invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Invalid parameter error
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl Error {
    /// Create an invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
