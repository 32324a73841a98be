//! # custodia-engine: The Evidence Custody Service
//!
//! The process-level entry point to the engine. Embedding applications
//! construct one [`CustodyService`] per process from an [`EngineConfig`]
//! and call its four operations:
//!
//! - [`CustodyService::collect`]: register and fingerprint new evidence.
//! - [`CustodyService::append_custody`]: record a handling event.
//! - [`CustodyService::verify_integrity`]: re-derive every integrity claim.
//! - [`CustodyService::format_for_court`]: build the sealed submission
//!   package.
//!
//! The service holds its collaborators (store, ledger, signer, verifier,
//! packager, clock) as injected dependencies; nothing lives in ambient or
//! session state. Construction fails hard if the signing keystore is
//! missing: there is no fallback signing mode.
//!
//! The engine exposes no HTTP surface, no UI, and no CLI; those belong to
//! the layers built on top of it.

pub mod config;
pub mod error;
pub mod service;

pub use config::EngineConfig;
pub use error::CustodyError;
pub use service::{Actor, CollectRequest, CustodyService, EvidenceSummary};
