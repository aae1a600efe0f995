//! Normalizer configuration and metrics

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{IngestionConfig, DEFAULT_MAX_UPLOAD_BYTES};

/// Normalizer configuration
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Largest accepted payload in bytes
    pub max_payload_bytes: u64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl From<&IngestionConfig> for NormalizerConfig {
    fn from(config: &IngestionConfig) -> Self {
        Self {
            max_payload_bytes: config.max_upload_bytes,
        }
    }
}

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Payloads accepted for normalization
    pub payloads_accepted: AtomicU64,

    /// Payloads rejected (format, size, empty)
    pub payloads_rejected: AtomicU64,

    /// Rows handed out across all passes
    pub rows_produced: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record payload accepted
    pub fn record_accepted(&self) {
        self.payloads_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record payload rejected
    pub fn record_rejected(&self) {
        self.payloads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one row produced
    pub fn record_row(&self) {
        self.rows_produced.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            payloads_accepted: self.payloads_accepted.load(Ordering::Relaxed),
            payloads_rejected: self.payloads_rejected.load(Ordering::Relaxed),
            rows_produced: self.rows_produced.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub payloads_accepted: u64,
    pub payloads_rejected: u64,
    pub rows_produced: u64,
}
