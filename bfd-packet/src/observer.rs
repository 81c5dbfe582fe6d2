//! Decode observation hooks
//!
//! The codec reports every unpacked header before validating it, and the
//! outcome afterwards. Hooks are for observability only and cannot change
//! the decode result.

use bfd_core::DecodeError;
use std::fmt;
use tracing::debug;

use crate::packet::ControlHeader;

/// Receives decode events from [`crate::BfdControlPacket::decode_with`]
pub trait DecodeObserver: Send + Sync {
    /// Called once the fixed header has been unpacked, before validation
    fn header_decoded(&self, header: &ControlHeader, received: usize, source: &dyn fmt::Debug);

    /// Called when validation succeeded
    fn packet_accepted(&self, _header: &ControlHeader, _source: &dyn fmt::Debug) {}

    /// Called when the datagram was rejected
    fn packet_rejected(&self, _error: &DecodeError, _received: usize, _source: &dyn fmt::Debug) {}
}

/// Logs every decoded header as a `tracing` debug event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DecodeObserver for TracingObserver {
    fn header_decoded(&self, header: &ControlHeader, received: usize, source: &dyn fmt::Debug) {
        debug!(
            source = ?source,
            received,
            version = header.version,
            diag = header.diagnostic,
            state = %header.state,
            poll = header.poll,
            final_bit = header.final_bit,
            control_plane_independent = header.control_plane_independent,
            authentication_present = header.authentication_present,
            demand_mode = header.demand_mode,
            multipoint = header.multipoint,
            detect_mult = header.detect_mult,
            length = header.length,
            my_discriminator = header.my_discriminator,
            your_discriminator = header.your_discriminator,
            desired_min_tx_interval = header.desired_min_tx_interval,
            required_min_rx_interval = header.required_min_rx_interval,
            required_min_echo_rx_interval = header.required_min_echo_rx_interval,
            "Decoded BFD control header"
        );
    }

    fn packet_rejected(&self, error: &DecodeError, received: usize, source: &dyn fmt::Debug) {
        debug!(
            source = ?source,
            received,
            reason = error.kind(),
            "Rejected BFD control packet: {}",
            error
        );
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DecodeObserver for NoopObserver {
    fn header_decoded(&self, _header: &ControlHeader, _received: usize, _source: &dyn fmt::Debug) {}
}
