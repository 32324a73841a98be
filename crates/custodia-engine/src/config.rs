//! # Engine Configuration
//!
//! Explicit configuration for the service, constructed and passed in by
//! the embedding process. There is no environment scraping and no config
//! file parsing here; a host that wants those layers builds them on top.

use std::path::{Path, PathBuf};

use custodia_verify::DEFAULT_INTEGRITY_THRESHOLD;

/// Configuration for [`crate::CustodyService`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root directory for records, ledger chains, blobs, and packages.
    pub data_dir: PathBuf,
    /// Directory holding the persisted signing keypair.
    pub keystore_dir: PathBuf,
    /// Verification score below which a report is flagged questionable.
    /// Flags the report only; gates nothing.
    pub integrity_threshold: f64,
}

impl EngineConfig {
    /// A configuration with the default integrity threshold.
    pub fn new(data_dir: impl Into<PathBuf>, keystore_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            keystore_dir: keystore_dir.into(),
            integrity_threshold: DEFAULT_INTEGRITY_THRESHOLD,
        }
    }

    /// Override the questionable-score threshold.
    pub fn with_integrity_threshold(mut self, threshold: f64) -> Self {
        self.integrity_threshold = threshold;
        self
    }

    /// Where custody chains are stored.
    pub fn ledger_dir(&self) -> PathBuf {
        self.data_dir.join("ledger")
    }

    /// Where sealed packages are written.
    pub fn packages_dir(&self) -> PathBuf {
        self.data_dir.join("packages")
    }

    /// The data root.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
