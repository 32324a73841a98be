//! # Ledger Error Types

use thiserror::Error;

/// Errors from custody ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The action is not a legal transition from the current status.
    #[error("invalid transition: {action} is not legal from {from}")]
    InvalidTransition {
        /// Current status name, or `NONE` for an empty chain.
        from: String,
        /// The attempted action name.
        action: String,
    },

    /// The chain head moved between the caller's read and this append.
    /// The caller must reread the head and retry.
    #[error("concurrent modification: expected head {expected}, found {actual}")]
    ConcurrentModification {
        /// The head the caller read.
        expected: String,
        /// The head actually on the chain.
        actual: String,
    },

    /// A persisted chain file is not valid.
    #[error("corrupt ledger file for evidence {evidence_id}: {reason}")]
    CorruptChain {
        /// The affected evidence id.
        evidence_id: String,
        /// What failed to parse or validate.
        reason: String,
    },

    /// IO error reading or writing chain files.
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure persisting a chain.
    #[error("ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
