//! # The Evidence Record
//!
//! [`EvidenceRecord`] is the persisted description of one collected
//! evidence item.
//!
//! ## Immutability
//!
//! `original_fingerprint` is set exactly once at collection and never
//! rewritten; verification recomputes a current fingerprint on demand and
//! compares, it does not store it. The only field the engine ever updates
//! after creation is the cached `status`, and only in lockstep with a
//! ledger transition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use custodia_core::{
    ActorId, CaseNumber, ContentDigest, EvidenceId, EvidenceType, SigningInput, SourcePayload,
    Timestamp,
};
use custodia_crypto::Ed25519Signature;
use custodia_ledger::EvidenceStatus;

use crate::manifest::FileManifest;

/// Named boolean compliance requirements tracked per record.
///
/// Initialized unmet at collection. Verification never mutates the stored
/// record; the court package evaluates a fresh checklist from the
/// verification report at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceChecklist(BTreeMap<String, bool>);

/// Requirement: the custody chain replays intact.
pub const REQ_CUSTODY_MAINTAINED: &str = "custody_maintained";
/// Requirement: the record signature verifies.
pub const REQ_SIGNATURE_VALID: &str = "signature_valid";
/// Requirement: the collection timestamp is signed and consistent.
pub const REQ_TIMESTAMP_AUTHENTICATED: &str = "timestamp_authenticated";
/// Requirement: the source payload matches its original fingerprint.
pub const REQ_SOURCE_VERIFIED: &str = "source_verified";
/// Requirement: all attached files match the manifest.
pub const REQ_INTEGRITY_PRESERVED: &str = "integrity_preserved";

const REQUIREMENTS: [&str; 5] = [
    REQ_CUSTODY_MAINTAINED,
    REQ_SIGNATURE_VALID,
    REQ_TIMESTAMP_AUTHENTICATED,
    REQ_SOURCE_VERIFIED,
    REQ_INTEGRITY_PRESERVED,
];

impl ComplianceChecklist {
    /// A fresh checklist with every requirement unmet.
    pub fn unmet() -> Self {
        Self(REQUIREMENTS.iter().map(|r| (r.to_string(), false)).collect())
    }

    /// Set one requirement.
    pub fn set(&mut self, requirement: &str, met: bool) {
        self.0.insert(requirement.to_string(), met);
    }

    /// Whether a requirement is met (absent counts as unmet).
    pub fn is_met(&self, requirement: &str) -> bool {
        self.0.get(requirement).copied().unwrap_or(false)
    }

    /// Whether every requirement is met.
    pub fn all_met(&self) -> bool {
        !self.0.is_empty() && self.0.values().all(|v| *v)
    }

    /// The requirements and their states, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for ComplianceChecklist {
    fn default() -> Self {
        Self::unmet()
    }
}

/// The persisted description of one collected evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Unique identifier, assigned at creation, never reused.
    pub evidence_id: EvidenceId,
    /// The case this evidence belongs to.
    pub case_number: CaseNumber,
    /// The evidence type; always equals `source_payload.evidence_type()`.
    pub evidence_type: EvidenceType,
    /// The platform or system the evidence came from.
    pub source_platform: String,
    /// Who collected it.
    pub collected_by: ActorId,
    /// When it was collected.
    pub collected_at: Timestamp,
    /// Where it was collected.
    pub location_collected: String,
    /// Free-form description.
    pub description: String,
    /// What was collected.
    pub source_payload: SourcePayload,
    /// Fingerprint of the canonicalized payload, write-once.
    pub original_fingerprint: ContentDigest,
    /// Ed25519 signature over the canonical record signing string.
    pub signature: Ed25519Signature,
    /// Cached lifecycle status; ledger fold is the source of truth.
    pub status: EvidenceStatus,
    /// Ordered manifest of attached files.
    pub file_manifest: FileManifest,
    /// Named compliance requirements.
    pub compliance_checklist: ComplianceChecklist,
}

impl EvidenceRecord {
    /// The canonical signing string this record's signature covers.
    pub fn signing_input(&self) -> SigningInput {
        SigningInput::for_record(
            &self.evidence_id,
            &self.case_number,
            &self.collected_at,
            &self.original_fingerprint,
        )
    }
}
