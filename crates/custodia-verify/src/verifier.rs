//! # The Integrity Verifier
//!
//! Re-derives every cryptographic claim about an evidence item and scores
//! the result.
//!
//! ## Checks
//!
//! 1. `fingerprint_match`: recompute the payload fingerprint from the
//!    stored source payload, compare to `original_fingerprint` in constant
//!    time.
//! 2. `signature_valid`: verify the record signature over the canonical
//!    signing string.
//! 3. `chain_continuity`: replay the custody chain from genesis, and
//!    require the folded status to equal the record's cached status. The
//!    fold comparison catches tail truncation, which a bare replay of a
//!    singly-linked chain cannot see.
//! 4. `file_manifest`: re-hash every manifest blob against its recorded
//!    digest; an empty manifest passes trivially.
//!
//! Read-only by construction: the verifier holds no mutable reference to
//! anything and a failing record keeps its failing report.

use subtle::ConstantTimeEq;
use thiserror::Error;

use custodia_core::{sha256_digest, CanonicalBytes, CanonicalizationError, EvidenceId, Timestamp};
use custodia_crypto::{verify_signature, Ed25519PublicKey};
use custodia_ledger::{CustodyLedger, LedgerError};
use custodia_store::{EvidenceStore, StoreError};

use crate::report::{
    VerificationReport, CHECK_CHAIN_CONTINUITY, CHECK_FILE_MANIFEST, CHECK_FINGERPRINT_MATCH,
    CHECK_SIGNATURE_VALID,
};

/// Default score threshold below which a report is flagged questionable.
pub const DEFAULT_INTEGRITY_THRESHOLD: f64 = 0.8;

/// Structural errors during verification. Integrity failures are never
/// errors; they are `false` entries in the report.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The evidence id is unknown.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The custody chain file could not be read.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The stored payload could not be canonicalized for recomputation.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

/// The read-only integrity verifier.
#[derive(Debug, Clone)]
pub struct IntegrityVerifier {
    threshold: f64,
}

impl IntegrityVerifier {
    /// A verifier with the given questionable-score threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The configured threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run all four checks for one evidence item.
    pub fn verify(
        &self,
        store: &EvidenceStore,
        ledger: &CustodyLedger,
        public_key: &Ed25519PublicKey,
        evidence_id: &EvidenceId,
        now: Timestamp,
    ) -> Result<VerificationReport, VerifyError> {
        let record = store.load(evidence_id)?;
        let mut report = VerificationReport::begin(*evidence_id, now);

        // Check 1: fingerprint match.
        let canonical = CanonicalBytes::new(&record.source_payload)?;
        let current = sha256_digest(&canonical);
        let fingerprint_match = bool::from(
            current.bytes[..].ct_eq(&record.original_fingerprint.bytes[..]),
        ) && current.algorithm == record.original_fingerprint.algorithm;
        report.record(CHECK_FINGERPRINT_MATCH, fingerprint_match);

        // Check 2: record signature.
        let signature_valid =
            verify_signature(&record.signing_input(), &record.signature, public_key);
        report.record(CHECK_SIGNATURE_VALID, signature_valid);

        // Check 3: chain continuity, including the status fold.
        let replay_ok = ledger.verify_chain(evidence_id, public_key)?;
        let entries = ledger.entries(evidence_id)?;
        let fold_matches = CustodyLedger::derive_status(&entries) == Some(record.status);
        report.record(CHECK_CHAIN_CONTINUITY, replay_ok && fold_matches);

        // Check 4: file manifest. Empty manifest passes trivially.
        let manifest_ok = record
            .file_manifest
            .entries()
            .iter()
            .all(|entry| store.blobs().verify(&entry.sha256));
        report.record(CHECK_FILE_MANIFEST, manifest_ok);

        report.finalize(self.threshold);

        if report.questionable {
            tracing::warn!(
                evidence_id = %evidence_id,
                score = report.integrity_score,
                threshold = self.threshold,
                "integrity verification flagged questionable"
            );
        } else {
            tracing::debug!(
                evidence_id = %evidence_id,
                score = report.integrity_score,
                "integrity verification passed"
            );
        }
        Ok(report)
    }
}

impl Default for IntegrityVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_INTEGRITY_THRESHOLD)
    }
}
