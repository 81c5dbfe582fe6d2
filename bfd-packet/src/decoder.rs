//! Receive-side decoder front-end
//!
//! Bundles a configuration, an observer and shared counters so that a
//! transport loop can hand over `(bytes, source)` pairs and simply drop
//! whatever comes back as an error.

use bfd_core::DecodeError;
use std::fmt;
use std::sync::Arc;

use crate::config::DecoderConfig;
use crate::observer::{DecodeObserver, TracingObserver};
use crate::packet::BfdControlPacket;
use crate::stats::{DecodeStats, DecodeStatsCounters};

/// Shared, thread-safe BFD control packet decoder
#[derive(Clone)]
pub struct PacketDecoder {
    config: DecoderConfig,
    observer: Arc<dyn DecodeObserver>,
    stats: Arc<DecodeStatsCounters>,
}

impl PacketDecoder {
    /// Create a decoder with default configuration that logs through `tracing`
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            observer: Arc::new(TracingObserver),
            stats: Arc::new(DecodeStatsCounters::default()),
        }
    }

    /// Replace the observer
    pub fn with_observer(mut self, observer: Arc<dyn DecodeObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one datagram and account for the outcome
    pub fn decode<S: fmt::Debug>(
        &self,
        data: &[u8],
        source: S,
    ) -> Result<BfdControlPacket<S>, DecodeError> {
        self.stats.record_received(data.len());

        let result =
            BfdControlPacket::decode_with(data, source, &self.config, self.observer.as_ref());
        match &result {
            Ok(_) => self.stats.record_accepted(),
            Err(err) => self.stats.record_rejected(err),
        }

        result
    }

    /// Shared counters, for handing to a reporting task
    pub fn counters(&self) -> Arc<DecodeStatsCounters> {
        Arc::clone(&self.stats)
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats.to_stats()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PacketDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketDecoder")
            .field("config", &self.config)
            .field("stats", &self.stats.to_stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use crate::packet::ControlHeader;
    use bfd_core::BfdState;
    use std::net::SocketAddr;
    use std::thread;

    fn peer() -> SocketAddr {
        "198.51.100.7:49200".parse().unwrap()
    }

    #[test]
    fn test_decode_counts_outcomes() {
        let decoder = PacketDecoder::new().with_observer(Arc::new(NoopObserver));

        let good = ControlHeader::new(1, 0).to_bytes();
        let bad = ControlHeader::new(1, 0).with_state(BfdState::Up).to_bytes();

        assert!(decoder.decode(&good, peer()).is_ok());
        assert!(decoder.decode(&bad, peer()).is_err());
        assert!(decoder.decode(&good[..10], peer()).is_err());

        let stats = decoder.stats();
        assert_eq!(stats.packets_received, 3);
        assert_eq!(stats.packets_accepted, 1);
        assert_eq!(stats.packets_rejected, 2);
        assert_eq!(stats.bytes_received, 58);
        assert_eq!(stats.rejected("zero_your_discriminator"), 1);
        assert_eq!(stats.rejected("below_minimum_size"), 1);

        decoder.reset_stats();
        assert_eq!(decoder.stats(), DecodeStats::default());
    }

    #[test]
    fn test_decode_honours_config() {
        let config = DecoderConfig::default().with_reject_zero_detect_mult(true);
        let decoder = PacketDecoder::with_config(config).with_observer(Arc::new(NoopObserver));
        assert!(decoder.config().reject_zero_detect_mult);

        let data = ControlHeader::new(1, 0).with_detect_mult(0).to_bytes();
        assert_eq!(
            decoder.decode(&data, peer()).unwrap_err(),
            DecodeError::ZeroDetectMult
        );
        assert_eq!(
            decoder.stats().rejected_for(&DecodeError::ZeroDetectMult),
            1
        );
    }

    #[test]
    fn test_shared_across_threads() {
        let decoder = PacketDecoder::new().with_observer(Arc::new(NoopObserver));
        let data = ControlHeader::new(9, 0).to_bytes();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let decoder = decoder.clone();
                let data = data.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        let packet = decoder.decode(&data, peer()).unwrap();
                        assert_eq!(packet.my_discriminator(), 9);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = decoder.counters().to_stats();
        assert_eq!(stats.packets_received, 1000);
        assert_eq!(stats.packets_accepted, 1000);
    }
}
