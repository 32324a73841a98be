//! # Content-Addressed Blob Store
//!
//! Storage for evidence attachments, keyed by content digest:
//! `{root}/{hh}/{digest_hex}` where `hh` is the first two hex chars.
//!
//! ## Integrity Invariant
//!
//! A blob's path IS its digest. The file manifest on the evidence record is
//! the sole source of truth for file identity; nothing about the storage
//! location encodes a case number or evidence id, so re-homing a store
//! never breaks a manifest. Identical attachments across evidence items
//! deduplicate naturally.
//!
//! Ingestion copies through a temp sibling and renames, so a crashed copy
//! never leaves a half-written blob at a digest path.

use std::path::{Path, PathBuf};

use crate::error::BlobError;
use crate::filehash::stream_sha256;

/// A stored blob: its digest and byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// Lowercase hex SHA-256 of the blob contents (64 chars).
    pub sha256: String,
    /// Blob size in bytes.
    pub size: u64,
}

/// A filesystem-backed content-addressed store for attachments.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Open (creating if needed) a blob store rooted at the given
    /// directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The storage path for a digest.
    pub fn blob_path(&self, sha256_hex: &str) -> PathBuf {
        let fanout = &sha256_hex[..2.min(sha256_hex.len())];
        self.root.join(fanout).join(sha256_hex)
    }

    /// Whether a blob with this digest is present.
    pub fn contains(&self, sha256_hex: &str) -> bool {
        self.blob_path(sha256_hex).is_file()
    }

    /// Ingest a file: stream-hash it and copy it to its digest path.
    ///
    /// Fails with `MissingFile` if the source does not exist. Ingesting
    /// the same content twice is a no-op beyond the rehash.
    pub fn ingest(&self, source: &Path) -> Result<BlobRef, BlobError> {
        if !source.is_file() {
            return Err(BlobError::MissingFile {
                path: source.to_path_buf(),
            });
        }
        let fd = stream_sha256(source)?;
        let dest = self.blob_path(&fd.sha256);
        if !dest.exists() {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let tmp = dest.with_extension("tmp");
            std::fs::copy(source, &tmp)?;
            std::fs::rename(&tmp, &dest)?;
            tracing::debug!(digest = %fd.sha256, size = fd.size, "ingested blob");
        }
        Ok(BlobRef {
            sha256: fd.sha256,
            size: fd.size,
        })
    }

    /// Read a stored blob's bytes.
    ///
    /// Fails with `NotStored` if the digest is absent.
    pub fn read(&self, sha256_hex: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.blob_path(sha256_hex);
        if !path.is_file() {
            return Err(BlobError::NotStored {
                digest: sha256_hex.to_string(),
            });
        }
        Ok(std::fs::read(path)?)
    }

    /// Re-hash a stored blob and compare against its claimed digest.
    ///
    /// Returns `false` for an absent blob or a digest mismatch; this is an
    /// integrity check, not an error path.
    pub fn verify(&self, sha256_hex: &str) -> bool {
        let path = self.blob_path(sha256_hex);
        if !path.is_file() {
            return false;
        }
        match stream_sha256(&path) {
            Ok(fd) => fd.sha256 == sha256_hex,
            Err(_) => false,
        }
    }
}
