//! BFD Control Packet Parser and Builder
//!
//! Decodes the fixed 24-byte control header described in RFC 5880 section 4.1
//! and applies the receive-side validation rules of section 6.8.6 that do not
//! depend on session state:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |Vers |  Diag   |Sta|P|F|C|A|D|M|  Detect Mult  |    Length     |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                       My Discriminator                        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      Your Discriminator                       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                    Desired Min TX Interval                    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                   Required Min RX Interval                    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                 Required Min Echo RX Interval                 |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use bfd_core::{
    BfdDiagnostic, BfdState, DecodeError, BFD_HEADER_LEN, BFD_MIN_AUTH_PACKET_LEN, BFD_VERSION,
};
use bytes::{BufMut, BytesMut};
use rand::Rng;
use std::fmt;
use std::net::SocketAddr;

use crate::config::DecoderConfig;
use crate::observer::{DecodeObserver, TracingObserver};

const FLAG_POLL: u8 = 0x20;
const FLAG_FINAL: u8 = 0x10;
const FLAG_CONTROL_PLANE_INDEPENDENT: u8 = 0x08;
const FLAG_AUTHENTICATION_PRESENT: u8 = 0x04;
const FLAG_DEMAND: u8 = 0x02;
const FLAG_MULTIPOINT: u8 = 0x01;

/// Default Detect Mult for locally built headers
pub const BFD_DEFAULT_DETECT_MULT: u8 = 3;

/// Default TX/RX interval for locally built headers (1 second)
pub const BFD_DEFAULT_INTERVAL_US: u32 = 1_000_000;

/// Fixed portion of a BFD control packet, field for field
///
/// Sub-byte fields hold the raw wire value; encoding masks them back to
/// their bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlHeader {
    /// Protocol version (3 bits)
    pub version: u8,
    /// Diagnostic code (5 bits), carried through uninterpreted
    pub diagnostic: u8,
    /// Sender session state
    pub state: BfdState,
    pub poll: bool,
    pub final_bit: bool,
    pub control_plane_independent: bool,
    pub authentication_present: bool,
    pub demand_mode: bool,
    pub multipoint: bool,
    pub detect_mult: u8,
    /// Total packet length claimed by the sender
    pub length: u8,
    pub my_discriminator: u32,
    pub your_discriminator: u32,
    /// Microseconds
    pub desired_min_tx_interval: u32,
    /// Microseconds
    pub required_min_rx_interval: u32,
    /// Microseconds
    pub required_min_echo_rx_interval: u32,
}

impl ControlHeader {
    /// Create a Down header with RFC defaults
    pub fn new(my_disc: u32, your_disc: u32) -> Self {
        Self {
            version: BFD_VERSION,
            diagnostic: BfdDiagnostic::None.to_u8(),
            state: BfdState::Down,
            poll: false,
            final_bit: false,
            control_plane_independent: false,
            authentication_present: false,
            demand_mode: false,
            multipoint: false,
            detect_mult: BFD_DEFAULT_DETECT_MULT,
            length: BFD_HEADER_LEN as u8,
            my_discriminator: my_disc,
            your_discriminator: your_disc,
            desired_min_tx_interval: BFD_DEFAULT_INTERVAL_US,
            required_min_rx_interval: BFD_DEFAULT_INTERVAL_US,
            required_min_echo_rx_interval: 0,
        }
    }

    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn with_state(mut self, state: BfdState) -> Self {
        self.state = state;
        self
    }

    pub fn with_diagnostic(mut self, diag: BfdDiagnostic) -> Self {
        self.diagnostic = diag.to_u8();
        self
    }

    /// Set a diagnostic code that may not be one of the RFC values
    pub fn with_raw_diagnostic(mut self, diag: u8) -> Self {
        self.diagnostic = diag;
        self
    }

    pub fn with_detect_mult(mut self, detect_mult: u8) -> Self {
        self.detect_mult = detect_mult;
        self
    }

    pub fn with_length(mut self, length: u8) -> Self {
        self.length = length;
        self
    }

    pub fn with_intervals(mut self, tx: u32, rx: u32) -> Self {
        self.desired_min_tx_interval = tx;
        self.required_min_rx_interval = rx;
        self
    }

    pub fn with_echo_interval(mut self, echo_rx: u32) -> Self {
        self.required_min_echo_rx_interval = echo_rx;
        self
    }

    pub fn with_poll(mut self, poll: bool) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_final(mut self, final_bit: bool) -> Self {
        self.final_bit = final_bit;
        self
    }

    pub fn with_control_plane_independent(mut self, cpi: bool) -> Self {
        self.control_plane_independent = cpi;
        self
    }

    pub fn with_authentication(mut self, present: bool) -> Self {
        self.authentication_present = present;
        self
    }

    pub fn with_demand_mode(mut self, demand: bool) -> Self {
        self.demand_mode = demand;
        self
    }

    pub fn with_multipoint(mut self, multipoint: bool) -> Self {
        self.multipoint = multipoint;
        self
    }

    /// Typed view of the diagnostic field, `None` for reserved codes
    pub fn diagnostic_kind(&self) -> Option<BfdDiagnostic> {
        BfdDiagnostic::from_u8(self.diagnostic)
    }

    /// Unpack the fixed header. Bits are taken most significant first.
    pub fn unpack(bytes: &[u8; BFD_HEADER_LEN]) -> Self {
        let flags = bytes[1];
        let word = |offset: usize| {
            u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };

        Self {
            version: bytes[0] >> 5,
            diagnostic: bytes[0] & 0x1F,
            state: BfdState::from_bits(flags >> 6),
            poll: flags & FLAG_POLL != 0,
            final_bit: flags & FLAG_FINAL != 0,
            control_plane_independent: flags & FLAG_CONTROL_PLANE_INDEPENDENT != 0,
            authentication_present: flags & FLAG_AUTHENTICATION_PRESENT != 0,
            demand_mode: flags & FLAG_DEMAND != 0,
            multipoint: flags & FLAG_MULTIPOINT != 0,
            detect_mult: bytes[2],
            length: bytes[3],
            my_discriminator: word(4),
            your_discriminator: word(8),
            desired_min_tx_interval: word(12),
            required_min_rx_interval: word(16),
            required_min_echo_rx_interval: word(20),
        }
    }

    /// Check the header against the number of bytes actually received.
    ///
    /// Rules run in a fixed order and the first violation is returned.
    pub fn validate(&self, received: usize) -> Result<(), DecodeError> {
        if self.version != BFD_VERSION {
            return Err(DecodeError::UnsupportedVersion {
                version: self.version,
            });
        }

        if self.authentication_present {
            if received < BFD_MIN_AUTH_PACKET_LEN {
                return Err(DecodeError::BelowAuthenticatedMinimum {
                    received,
                    minimum: BFD_MIN_AUTH_PACKET_LEN,
                });
            }
        } else if received < BFD_HEADER_LEN {
            return Err(DecodeError::BelowMinimumSize {
                received,
                minimum: BFD_HEADER_LEN,
            });
        }

        if usize::from(self.length) > received {
            return Err(DecodeError::LengthExceedsReceived {
                claimed: self.length,
                received,
            });
        }

        if self.multipoint {
            return Err(DecodeError::MultipointSet);
        }

        if self.my_discriminator == 0 {
            return Err(DecodeError::ZeroMyDiscriminator);
        }

        if self.your_discriminator == 0 && !self.state.is_down() {
            return Err(DecodeError::ZeroYourDiscriminator {
                state: self.state.to_u8(),
            });
        }

        Ok(())
    }

    /// Encode the fixed header into its 24-byte wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(BFD_HEADER_LEN);

        buffer.put_u8(((self.version & 0x07) << 5) | (self.diagnostic & 0x1F));

        let mut flags = self.state.to_u8() << 6;
        if self.poll {
            flags |= FLAG_POLL;
        }
        if self.final_bit {
            flags |= FLAG_FINAL;
        }
        if self.control_plane_independent {
            flags |= FLAG_CONTROL_PLANE_INDEPENDENT;
        }
        if self.authentication_present {
            flags |= FLAG_AUTHENTICATION_PRESENT;
        }
        if self.demand_mode {
            flags |= FLAG_DEMAND;
        }
        if self.multipoint {
            flags |= FLAG_MULTIPOINT;
        }
        buffer.put_u8(flags);

        buffer.put_u8(self.detect_mult);
        buffer.put_u8(self.length);
        buffer.put_u32(self.my_discriminator);
        buffer.put_u32(self.your_discriminator);
        buffer.put_u32(self.desired_min_tx_interval);
        buffer.put_u32(self.required_min_rx_interval);
        buffer.put_u32(self.required_min_echo_rx_interval);

        buffer.to_vec()
    }
}

/// A validated BFD control packet received from `source`
///
/// Only obtainable through [`BfdControlPacket::decode`] and friends, so every
/// instance has passed validation. The source endpoint is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfdControlPacket<S = SocketAddr> {
    header: ControlHeader,
    source: S,
}

impl<S: fmt::Debug> BfdControlPacket<S> {
    /// Decode and validate a datagram, logging the header through `tracing`
    pub fn decode(data: &[u8], source: S) -> Result<Self, DecodeError> {
        Self::decode_with(data, source, &DecoderConfig::default(), &TracingObserver)
    }

    /// Decode and validate a datagram with an explicit configuration and
    /// observer
    pub fn decode_with(
        data: &[u8],
        source: S,
        config: &DecoderConfig,
        observer: &dyn DecodeObserver,
    ) -> Result<Self, DecodeError> {
        let received = data.len();

        let result = Self::parse(data, &source, config, observer);
        match &result {
            Ok(header) => observer.packet_accepted(header, &source),
            Err(err) => observer.packet_rejected(err, received, &source),
        }

        result.map(|header| Self { header, source })
    }

    fn parse(
        data: &[u8],
        source: &S,
        config: &DecoderConfig,
        observer: &dyn DecodeObserver,
    ) -> Result<ControlHeader, DecodeError> {
        let received = data.len();
        let fixed: &[u8; BFD_HEADER_LEN] = data
            .get(..BFD_HEADER_LEN)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(DecodeError::BelowMinimumSize {
                received,
                minimum: BFD_HEADER_LEN,
            })?;

        let header = ControlHeader::unpack(fixed);
        observer.header_decoded(&header, received, source);

        header.validate(received)?;

        if config.reject_zero_detect_mult && header.detect_mult == 0 {
            return Err(DecodeError::ZeroDetectMult);
        }

        Ok(header)
    }
}

impl<S> BfdControlPacket<S> {
    pub fn header(&self) -> &ControlHeader {
        &self.header
    }

    /// Endpoint the datagram was received from
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_parts(self) -> (ControlHeader, S) {
        (self.header, self.source)
    }

    pub fn version(&self) -> u8 {
        self.header.version
    }

    pub fn diagnostic(&self) -> u8 {
        self.header.diagnostic
    }

    pub fn diagnostic_kind(&self) -> Option<BfdDiagnostic> {
        self.header.diagnostic_kind()
    }

    pub fn state(&self) -> BfdState {
        self.header.state
    }

    pub fn poll(&self) -> bool {
        self.header.poll
    }

    pub fn final_bit(&self) -> bool {
        self.header.final_bit
    }

    pub fn control_plane_independent(&self) -> bool {
        self.header.control_plane_independent
    }

    pub fn authentication_present(&self) -> bool {
        self.header.authentication_present
    }

    pub fn demand_mode(&self) -> bool {
        self.header.demand_mode
    }

    pub fn multipoint(&self) -> bool {
        self.header.multipoint
    }

    pub fn detect_mult(&self) -> u8 {
        self.header.detect_mult
    }

    pub fn length(&self) -> u8 {
        self.header.length
    }

    pub fn my_discriminator(&self) -> u32 {
        self.header.my_discriminator
    }

    pub fn your_discriminator(&self) -> u32 {
        self.header.your_discriminator
    }

    pub fn desired_min_tx_interval(&self) -> u32 {
        self.header.desired_min_tx_interval
    }

    pub fn required_min_rx_interval(&self) -> u32 {
        self.header.required_min_rx_interval
    }

    pub fn required_min_echo_rx_interval(&self) -> u32 {
        self.header.required_min_echo_rx_interval
    }

    /// Re-encode the fixed header
    pub fn to_bytes(&self) -> Vec<u8> {
        self.header.to_bytes()
    }
}

/// Pick a random non-zero discriminator for a new local session
pub fn random_discriminator() -> u32 {
    rand::thread_rng().gen_range(1..=u32::MAX)
}
