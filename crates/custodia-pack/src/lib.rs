//! # custodia-pack: Court Submission Packaging
//!
//! Assembles the sealed, exportable bundle for legal submission:
//!
//! - [`documents`]: deterministic rendering of the four court documents
//!   (certificate of authenticity, technical summary, custody transcript,
//!   evidence summary) from record and ledger data alone.
//! - [`builder`]: the [`CourtPackageBuilder`], which bundles documents,
//!   the canonical source payload, the custody chain, the verification
//!   report, and every attached blob into a single zip archive at a
//!   content-addressed path.
//!
//! ## Determinism
//!
//! Document rendering reads no clock, touches no network, and draws no
//! randomness; two builds over the same record and ledger produce
//! byte-identical documents and the same package digest. The archive is
//! written to a temp sibling and atomically renamed, so a partial package
//! is never visible at the final path.

pub mod builder;
pub mod documents;

pub use builder::{checklist_from_report, CourtDetails, CourtPackageBuilder, PackError};
