//! # custodia-ledger: Tamper-Evident Chain of Custody
//!
//! The append-only, hash-chained custody ledger:
//!
//! - [`status`]: the evidence lifecycle state machine and custody actions.
//! - [`entry`]: the immutable, signed, hash-chained [`CustodyEntry`].
//! - [`ledger`]: the [`CustodyLedger`] itself: per-evidence chains with
//!   optimistic-concurrency appends and full replay verification.
//!
//! ## Integrity Model
//!
//! Each entry's hash covers its canonical content and its predecessor's
//! hash, chaining back to a fixed genesis value. Truncation, reordering,
//! or insertion anywhere in a chain changes every downstream hash, so a
//! single replay from genesis detects any rewrite. Every entry is also
//! individually signed, so a forged rewrite additionally requires the
//! private key.

pub mod entry;
pub mod error;
pub mod ledger;
pub mod status;

pub use entry::{compute_entry_hash, CustodyEntry, GENESIS_HASH};
pub use error::LedgerError;
pub use ledger::{AppendRequest, CustodyLedger};
pub use status::{transition_allowed, CustodyAction, EvidenceStatus};
