//! # Canonical Signing Strings
//!
//! Defines `SigningInput`, the only byte sequences the signature service
//! ever signs or verifies.
//!
//! ## Security Invariant
//!
//! `SigningInput` has a private inner field and exactly two constructors,
//! one per signed artifact. Interoperability depends on these formats being
//! reproduced byte-for-byte, so they are built here, once, and nowhere
//! else:
//!
//! - record:        `{evidence_id}:{case_number}:{collected_at}:{fingerprint_hex}`
//! - custody entry: `{evidence_id}:{timestamp}:{actor_id}:{action}:{prev_entry_hash}`
//!
//! Timestamps render as ISO 8601 UTC with Z suffix; fingerprints and entry
//! hashes render as 64 lowercase hex chars; the action renders as its
//! UPPERCASE name.

use crate::digest::ContentDigest;
use crate::identity::{ActorId, CaseNumber, EvidenceId};
use crate::temporal::Timestamp;

/// A canonical signing string, the sole input type for signing and
/// signature verification.
///
/// Cannot be constructed from arbitrary bytes: the constructors below are
/// the only production path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SigningInput(String);

impl SigningInput {
    /// The canonical signing string for an evidence record.
    pub fn for_record(
        evidence_id: &EvidenceId,
        case_number: &CaseNumber,
        collected_at: &Timestamp,
        original_fingerprint: &ContentDigest,
    ) -> Self {
        Self(format!(
            "{}:{}:{}:{}",
            evidence_id,
            case_number,
            collected_at.to_iso8601(),
            original_fingerprint.to_hex()
        ))
    }

    /// The canonical signing string for a custody ledger entry.
    ///
    /// `action` is the UPPERCASE action name; `prev_entry_hash` is the
    /// predecessor's entry hash (or the genesis value for the first entry).
    pub fn for_custody_entry(
        evidence_id: &EvidenceId,
        timestamp: &Timestamp,
        actor_id: &ActorId,
        action: &str,
        prev_entry_hash: &str,
    ) -> Self {
        Self(format!(
            "{}:{}:{}:{}:{}",
            evidence_id,
            timestamp.to_iso8601(),
            actor_id,
            action,
            prev_entry_hash
        ))
    }

    /// The canonical bytes to sign.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
