//! # The Service Error Taxonomy
//!
//! [`CustodyError`] is what callers of the four public operations see.
//! Structural errors abort the operation and surface here; integrity
//! failures never do; they are `false` entries inside a
//! `VerificationReport`.

use std::path::PathBuf;

use thiserror::Error;

use custodia_core::{CanonicalizationError, EvidenceId};
use custodia_crypto::{BlobError, KeystoreError};
use custodia_ledger::LedgerError;
use custodia_pack::PackError;
use custodia_store::StoreError;
use custodia_verify::VerifyError;

/// Errors surfaced by [`crate::CustodyService`].
#[derive(Error, Debug)]
pub enum CustodyError {
    /// A required collection field was empty. Rejected before any state is
    /// created.
    #[error("invalid input: {field} must not be empty")]
    InvalidInput {
        /// The offending field name.
        field: &'static str,
    },

    /// Unknown evidence id.
    #[error("evidence {evidence_id} not found")]
    NotFound {
        /// The unknown id.
        evidence_id: EvidenceId,
    },

    /// A declared attachment is absent.
    #[error("missing file: {path}")]
    MissingFile {
        /// The declared path.
        path: PathBuf,
    },

    /// Illegal status change attempted.
    #[error("invalid transition: {action} is not legal from {from}")]
    InvalidTransition {
        /// Current status name.
        from: String,
        /// Attempted action name.
        action: String,
    },

    /// The ledger head moved between read and append; reread and retry.
    #[error("concurrent modification: expected head {expected}, found {actual}")]
    ConcurrentModification {
        /// The head the caller read.
        expected: String,
        /// The head actually on the chain.
        actual: String,
    },

    /// Court package assembly failed.
    #[error("package build failed: {0}")]
    Build(String),

    /// The signing keystore could not be loaded. Fatal at construction.
    #[error(transparent)]
    Keystore(#[from] KeystoreError),

    /// Canonicalization failed.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// Persistence-layer failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for CustodyError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { evidence_id } => Self::NotFound { evidence_id },
            StoreError::MissingFile { path } => Self::MissingFile { path },
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<LedgerError> for CustodyError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InvalidTransition { from, action } => {
                Self::InvalidTransition { from, action }
            }
            LedgerError::ConcurrentModification { expected, actual } => {
                Self::ConcurrentModification { expected, actual }
            }
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<VerifyError> for CustodyError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Store(inner) => inner.into(),
            VerifyError::Ledger(inner) => inner.into(),
            VerifyError::Canonicalization(inner) => inner.into(),
        }
    }
}

impl From<PackError> for CustodyError {
    fn from(e: PackError) -> Self {
        Self::Build(e.to_string())
    }
}

impl From<BlobError> for CustodyError {
    fn from(e: BlobError) -> Self {
        match e {
            BlobError::MissingFile { path } => Self::MissingFile { path },
            other => Self::Storage(other.to_string()),
        }
    }
}
