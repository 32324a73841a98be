//! # Custody Entries: Signed, Hash-Chained Handling Records
//!
//! One [`CustodyEntry`] per handling event, immutable once written.
//!
//! ## Chain Construction
//!
//! Each entry carries:
//!
//! - `prev_hash`: the predecessor's `entry_hash`, or [`GENESIS_HASH`] for
//!   the first entry.
//! - `entry_hash`: SHA-256 over the entry's canonical content bytes
//!   followed by the `prev_hash` ASCII bytes.
//! - `entry_signature`: Ed25519 over the canonical content.
//!
//! The canonical content is the custody signing string
//! (`evidence_id:timestamp:actor_id:action:prev_hash`), so the predecessor
//! hash is bound twice: inside the signed statement and in the chain-link
//! hash. Replay recomputes both.

use custodia_core::{ActorId, EvidenceId, SigningInput, Timestamp};
use custodia_crypto::Ed25519Signature;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::status::CustodyAction;

/// The fixed value the first entry of every chain links from: 64 ASCII
/// zeros.
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// A single immutable entry in an evidence item's chain of custody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyEntry {
    /// Position in the chain, 0-indexed.
    pub sequence: u64,
    /// When the handling event occurred.
    pub timestamp: Timestamp,
    /// Identifier of the acting officer or system.
    pub actor_id: ActorId,
    /// Human-readable actor name.
    pub actor_name: String,
    /// What happened.
    pub action: CustodyAction,
    /// Where it happened.
    pub location: String,
    /// Free-form notes.
    pub notes: String,
    /// The predecessor's entry hash (64 hex chars), or the genesis value.
    pub prev_hash: String,
    /// This entry's chain hash (64 hex chars).
    pub entry_hash: String,
    /// Ed25519 signature over the canonical entry content.
    pub entry_signature: Ed25519Signature,
}

impl CustodyEntry {
    /// Rebuild this entry's canonical signing content.
    ///
    /// Replay verification recomputes this from the stored fields; if any
    /// field was edited after the fact, the signature and hash both stop
    /// matching.
    pub fn canonical_content(&self, evidence_id: &EvidenceId) -> SigningInput {
        SigningInput::for_custody_entry(
            evidence_id,
            &self.timestamp,
            &self.actor_id,
            self.action.as_str(),
            &self.prev_hash,
        )
    }
}

/// Compute an entry hash: SHA-256 over the canonical content bytes
/// followed by the predecessor hash's ASCII bytes.
pub fn compute_entry_hash(content: &SigningInput, prev_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
