//! Decode statistics

use bfd_core::DecodeError;
use std::sync::atomic::{AtomicU64, Ordering};

const REJECTION_KINDS: usize = DecodeError::KINDS.len();

/// Snapshot of decode statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Datagrams handed to the decoder
    pub packets_received: u64,
    /// Datagrams that decoded into a valid packet
    pub packets_accepted: u64,
    /// Datagrams rejected for any reason
    pub packets_rejected: u64,
    /// Total bytes handed to the decoder
    pub bytes_received: u64,
    /// Rejections per reason, indexed like [`DecodeError::KINDS`]
    pub rejections: [u64; REJECTION_KINDS],
}

impl DecodeStats {
    /// Rejection count for a reason label such as `"multipoint_set"`
    pub fn rejected(&self, kind: &str) -> u64 {
        DecodeError::KINDS
            .iter()
            .position(|k| *k == kind)
            .map(|i| self.rejections[i])
            .unwrap_or(0)
    }

    /// Rejection count for the rule `error` reports
    pub fn rejected_for(&self, error: &DecodeError) -> u64 {
        self.rejections[error.index()]
    }

    /// Non-zero rejection counts with their labels
    pub fn rejection_breakdown(&self) -> Vec<(&'static str, u64)> {
        DecodeError::KINDS
            .iter()
            .zip(self.rejections.iter())
            .filter(|(_, count)| **count > 0)
            .map(|(kind, count)| (*kind, *count))
            .collect()
    }
}

/// Thread-safe decode counters
#[derive(Debug, Default)]
pub struct DecodeStatsCounters {
    pub packets_received: AtomicU64,
    pub packets_accepted: AtomicU64,
    pub packets_rejected: AtomicU64,
    pub bytes_received: AtomicU64,
    rejections: [AtomicU64; REJECTION_KINDS],
}

impl DecodeStatsCounters {
    pub fn record_received(&self, bytes: usize) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received
            .fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_accepted(&self) {
        self.packets_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self, error: &DecodeError) {
        self.packets_rejected.fetch_add(1, Ordering::Relaxed);
        self.rejections[error.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn to_stats(&self) -> DecodeStats {
        let mut rejections = [0u64; REJECTION_KINDS];
        for (slot, counter) in rejections.iter_mut().zip(self.rejections.iter()) {
            *slot = counter.load(Ordering::Relaxed);
        }

        DecodeStats {
            packets_received: self.packets_received.load(Ordering::Relaxed),
            packets_accepted: self.packets_accepted.load(Ordering::Relaxed),
            packets_rejected: self.packets_rejected.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            rejections,
        }
    }

    pub fn reset(&self) {
        self.packets_received.store(0, Ordering::Relaxed);
        self.packets_accepted.store(0, Ordering::Relaxed);
        self.packets_rejected.store(0, Ordering::Relaxed);
        self.bytes_received.store(0, Ordering::Relaxed);
        for counter in &self.rejections {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
