//! # custodia-core: Foundational Types for the Custodia Evidence Engine
//!
//! This crate is the bedrock of the workspace. It defines the type-system
//! primitives that make evidence-integrity guarantees hold at compile time.
//! Every other crate depends on `custodia-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `EvidenceId`,
//!    `CaseNumber`, `ActorId`: validated, type-distinct identifiers. No bare
//!    strings for identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** ALL fingerprint computation flows
//!    through `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for
//!    digests, ever. Two serializations of the same payload must never
//!    produce two fingerprints.
//!
//! 3. **`SigningInput` newtype.** Everything the signer touches is one of
//!    two byte-exact canonical string formats, and the only way to build
//!    them is through the constructors in [`signing`].
//!
//! 4. **Closed `SourcePayload` sum type.** Evidence payloads are a tagged
//!    union over the fixed `EvidenceType` enumeration with a single opaque
//!    bytes field, so canonicalization is total and unambiguous.
//!
//! 5. **UTC-only timestamps.** `Timestamp` enforces UTC with Z suffix and
//!    seconds precision. Wall-clock access goes through the [`Clock`] trait
//!    so callers inject time instead of reading it ambiently.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `custodia-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod evidence;
pub mod identity;
pub mod signing;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::CanonicalizationError;
pub use evidence::{EvidenceType, RawPayload, SourcePayload};
pub use identity::{ActorId, CaseNumber, EvidenceId};
pub use signing::SigningInput;
pub use temporal::{Clock, SystemClock, Timestamp};
