//! # The Evidence Store
//!
//! Filesystem persistence for evidence records, plus attachment ingestion
//! into the content-addressed blob store.
//!
//! ## Invariants
//!
//! - `insert` is write-once per evidence id: an id is never reassigned and
//!   a record is never overwritten wholesale.
//! - `load` always parses the on-disk file, so out-of-band tampering is
//!   seen by the next verification.
//! - `update_status` is the only mutation, and callers invoke it solely in
//!   lockstep with a ledger transition. The original fingerprint it
//!   rewrites is byte-identical because the rest of the record is carried
//!   over unchanged from disk.
//! - Nothing is ever deleted here; retention is an external policy.

use std::path::{Path, PathBuf};

use thiserror::Error;

use custodia_core::EvidenceId;
use custodia_crypto::{BlobError, BlobStore};
use custodia_ledger::EvidenceStatus;

use crate::manifest::{FileManifest, FileManifestEntry};
use crate::record::EvidenceRecord;

/// Errors from evidence store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists for the given evidence id.
    #[error("evidence {evidence_id} not found")]
    NotFound {
        /// The unknown id.
        evidence_id: EvidenceId,
    },

    /// Refusing to overwrite an existing record.
    #[error("evidence {evidence_id} already exists; records are write-once")]
    AlreadyExists {
        /// The duplicate id.
        evidence_id: EvidenceId,
    },

    /// A declared attachment path does not exist.
    #[error("missing file: {path}")]
    MissingFile {
        /// The declared path.
        path: PathBuf,
    },

    /// A persisted record file is not valid.
    #[error("corrupt record file for evidence {evidence_id}: {reason}")]
    CorruptRecord {
        /// The affected evidence id.
        evidence_id: EvidenceId,
        /// What failed to parse.
        reason: String,
    },

    /// Blob store failure during attachment ingestion.
    #[error(transparent)]
    Blob(BlobError),

    /// IO error reading or writing record files.
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure persisting a record.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BlobError> for StoreError {
    fn from(e: BlobError) -> Self {
        match e {
            BlobError::MissingFile { path } => Self::MissingFile { path },
            other => Self::Blob(other),
        }
    }
}

/// The filesystem-backed evidence store.
#[derive(Debug)]
pub struct EvidenceStore {
    records_dir: PathBuf,
    blobs: BlobStore,
}

impl EvidenceStore {
    /// Open (creating if needed) a store under the given data directory:
    /// records at `{data_dir}/records`, blobs at `{data_dir}/blobs`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        let records_dir = data_dir.join("records");
        std::fs::create_dir_all(&records_dir)?;
        let blobs = BlobStore::open(data_dir.join("blobs"))?;
        Ok(Self { records_dir, blobs })
    }

    /// The content-addressed blob store for attachments.
    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    fn record_path(&self, evidence_id: &EvidenceId) -> PathBuf {
        self.records_dir.join(format!("{evidence_id}.json"))
    }

    /// Whether a record exists for the id.
    pub fn exists(&self, evidence_id: &EvidenceId) -> bool {
        self.record_path(evidence_id).is_file()
    }

    /// Ingest declared attachment files into the blob store and build the
    /// manifest, in declaration order.
    ///
    /// Fails with `MissingFile` on the first declared path that does not
    /// exist; called before any record state is created, so a failed
    /// collection leaves nothing behind.
    pub fn attach_files(&self, paths: &[PathBuf]) -> Result<FileManifest, StoreError> {
        let mut manifest = FileManifest::new();
        for path in paths {
            let blob = self.blobs.ingest(path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| blob.sha256.clone());
            manifest.push(FileManifestEntry {
                name,
                sha256: blob.sha256,
                size: blob.size,
            });
        }
        Ok(manifest)
    }

    /// Persist a new record. Write-once: fails with `AlreadyExists` if the
    /// id is taken.
    pub fn insert(&self, record: &EvidenceRecord) -> Result<(), StoreError> {
        let path = self.record_path(&record.evidence_id);
        if path.exists() {
            return Err(StoreError::AlreadyExists {
                evidence_id: record.evidence_id,
            });
        }
        self.persist(record)?;
        tracing::info!(
            evidence_id = %record.evidence_id,
            case_number = %record.case_number,
            evidence_type = %record.evidence_type,
            "evidence record persisted"
        );
        Ok(())
    }

    /// Load a record from disk.
    pub fn load(&self, evidence_id: &EvidenceId) -> Result<EvidenceRecord, StoreError> {
        let path = self.record_path(evidence_id);
        if !path.is_file() {
            return Err(StoreError::NotFound {
                evidence_id: *evidence_id,
            });
        }
        let bytes = std::fs::read(&path)?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptRecord {
            evidence_id: *evidence_id,
            reason: e.to_string(),
        })
    }

    /// Update the cached status, carrying every other field over
    /// unchanged from disk.
    pub fn update_status(
        &self,
        evidence_id: &EvidenceId,
        status: EvidenceStatus,
    ) -> Result<(), StoreError> {
        let mut record = self.load(evidence_id)?;
        record.status = status;
        self.persist(&record)?;
        tracing::debug!(evidence_id = %evidence_id, status = %status, "cached status updated");
        Ok(())
    }

    /// All evidence ids with a persisted record, in directory order.
    pub fn evidence_ids(&self) -> Result<Vec<EvidenceId>, StoreError> {
        let mut ids = Vec::new();
        for dirent in std::fs::read_dir(&self.records_dir)? {
            let name = dirent?.file_name();
            let Some(stem) = Path::new(&name).file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(id) = EvidenceId::parse(stem) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn persist(&self, record: &EvidenceRecord) -> Result<(), StoreError> {
        let path = self.record_path(&record.evidence_id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(record)?;
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
