//! # Evidence Lifecycle State Machine
//!
//! The legal processing status of an evidence item and the custody actions
//! that move it.
//!
//! ## States
//!
//! ```text
//! COLLECTED ──▶ VERIFIED ──▶ SEALED ──▶ SUBMITTED ──▶ ACCEPTED (terminal)
//!     │                        ▲                  └──▶ REJECTED (terminal)
//!     └────────────────────────┘
//! ```
//!
//! Sealing is reachable from both COLLECTED and VERIFIED: a court package
//! may be built for an item that was never independently verified, and the
//! package carries the verification report either way.
//!
//! VIEWED and TRANSFERRED record handling without changing status; they are
//! legal from any non-terminal state.

use serde::{Deserialize, Serialize};

/// The lifecycle status of an evidence record.
///
/// Always derivable by folding the custody ledger; the copy stored on the
/// record is a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    /// Evidence registered and fingerprinted.
    Collected,
    /// Integrity independently verified.
    Verified,
    /// Court package built; record frozen against content changes.
    Sealed,
    /// Submitted to a court.
    Submitted,
    /// Accepted by the court (terminal).
    Accepted,
    /// Rejected by the court (terminal).
    Rejected,
}

impl EvidenceStatus {
    /// Whether this status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// UPPERCASE name, as used in documents and signing strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collected => "COLLECTED",
            Self::Verified => "VERIFIED",
            Self::Sealed => "SEALED",
            Self::Submitted => "SUBMITTED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custody action recorded in the ledger.
///
/// Transition actions correspond 1:1 with status changes; VIEWED and
/// TRANSFERRED are bookkeeping actions that leave status untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustodyAction {
    /// Initial registration; only ever the genesis entry.
    Collected,
    /// Integrity verification completed.
    Verified,
    /// Court package built and sealed.
    Sealed,
    /// Submitted to a court.
    Submitted,
    /// Accepted by the court.
    Accepted,
    /// Rejected by the court.
    Rejected,
    /// Evidence was inspected without modification.
    Viewed,
    /// Physical or organizational custody handoff.
    Transferred,
}

impl CustodyAction {
    /// The status this action transitions to, or `None` for bookkeeping
    /// actions.
    pub fn target_status(&self) -> Option<EvidenceStatus> {
        match self {
            Self::Collected => Some(EvidenceStatus::Collected),
            Self::Verified => Some(EvidenceStatus::Verified),
            Self::Sealed => Some(EvidenceStatus::Sealed),
            Self::Submitted => Some(EvidenceStatus::Submitted),
            Self::Accepted => Some(EvidenceStatus::Accepted),
            Self::Rejected => Some(EvidenceStatus::Rejected),
            Self::Viewed | Self::Transferred => None,
        }
    }

    /// Whether this action changes status.
    pub fn is_transition(&self) -> bool {
        self.target_status().is_some()
    }

    /// UPPERCASE name, embedded byte-for-byte in the entry signing string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collected => "COLLECTED",
            Self::Verified => "VERIFIED",
            Self::Sealed => "SEALED",
            Self::Submitted => "SUBMITTED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Viewed => "VIEWED",
            Self::Transferred => "TRANSFERRED",
        }
    }
}

impl std::fmt::Display for CustodyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `action` is legal from `current` for an already-opened chain.
///
/// Genesis (the first COLLECTED entry on an empty chain) is handled by the
/// ledger itself; from here, COLLECTED is never legal again.
pub fn transition_allowed(current: EvidenceStatus, action: CustodyAction) -> bool {
    use CustodyAction as A;
    use EvidenceStatus as S;
    match action {
        A::Collected => false,
        A::Verified => current == S::Collected,
        A::Sealed => matches!(current, S::Collected | S::Verified),
        A::Submitted => current == S::Sealed,
        A::Accepted | A::Rejected => current == S::Submitted,
        A::Viewed | A::Transferred => !current.is_terminal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CustodyAction as A;
    use EvidenceStatus as S;

    #[test]
    fn happy_path_transitions() {
        assert!(transition_allowed(S::Collected, A::Verified));
        assert!(transition_allowed(S::Verified, A::Sealed));
        assert!(transition_allowed(S::Sealed, A::Submitted));
        assert!(transition_allowed(S::Submitted, A::Accepted));
        assert!(transition_allowed(S::Submitted, A::Rejected));
    }

    #[test]
    fn seal_directly_from_collected() {
        assert!(transition_allowed(S::Collected, A::Sealed));
    }

    #[test]
    fn skipping_states_is_illegal() {
        assert!(!transition_allowed(S::Collected, A::Submitted));
        assert!(!transition_allowed(S::Collected, A::Accepted));
        assert!(!transition_allowed(S::Verified, A::Submitted));
        assert!(!transition_allowed(S::Sealed, A::Accepted));
    }

    #[test]
    fn no_backwards_transitions() {
        assert!(!transition_allowed(S::Verified, A::Verified));
        assert!(!transition_allowed(S::Sealed, A::Verified));
        assert!(!transition_allowed(S::Submitted, A::Sealed));
    }

    #[test]
    fn collected_never_legal_after_genesis() {
        for s in [S::Collected, S::Verified, S::Sealed, S::Submitted, S::Accepted, S::Rejected] {
            assert!(!transition_allowed(s, A::Collected));
        }
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for s in [S::Accepted, S::Rejected] {
            assert!(s.is_terminal());
            for a in [
                A::Verified,
                A::Sealed,
                A::Submitted,
                A::Accepted,
                A::Rejected,
                A::Viewed,
                A::Transferred,
            ] {
                assert!(!transition_allowed(s, a), "{s} should reject {a}");
            }
        }
    }

    #[test]
    fn bookkeeping_actions_from_any_nonterminal() {
        for s in [S::Collected, S::Verified, S::Sealed, S::Submitted] {
            assert!(transition_allowed(s, A::Viewed));
            assert!(transition_allowed(s, A::Transferred));
        }
    }

    #[test]
    fn bookkeeping_actions_have_no_target() {
        assert_eq!(A::Viewed.target_status(), None);
        assert_eq!(A::Transferred.target_status(), None);
        assert!(!A::Viewed.is_transition());
        assert!(A::Sealed.is_transition());
    }

    #[test]
    fn display_is_uppercase() {
        assert_eq!(S::Collected.to_string(), "COLLECTED");
        assert_eq!(S::Rejected.to_string(), "REJECTED");
        assert_eq!(A::Transferred.to_string(), "TRANSFERRED");
    }

    #[test]
    fn serde_snake_case() {
        assert_eq!(serde_json::to_string(&S::Sealed).unwrap(), "\"sealed\"");
        assert_eq!(serde_json::to_string(&A::Viewed).unwrap(), "\"viewed\"");
        let s: EvidenceStatus = serde_json::from_str("\"submitted\"").unwrap();
        assert_eq!(s, S::Submitted);
    }
}
