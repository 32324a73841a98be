//! # custodia-verify: Evidence Integrity Verification
//!
//! Recomputes what was once fingerprinted and signed, and reports whether
//! any of it changed.
//!
//! ## Error Surface
//!
//! Verification is strictly read-only and never hides a failure: a hash
//! mismatch or invalid signature is a `false` entry in the
//! [`VerificationReport`], not an exception, and the record is left
//! exactly as it was found so the evidence of tampering is itself
//! preserved. Only structural problems (unknown id, unreadable files)
//! surface as errors.

pub mod report;
pub mod verifier;

pub use report::{
    VerificationReport, CHECK_CHAIN_CONTINUITY, CHECK_FILE_MANIFEST, CHECK_FINGERPRINT_MATCH,
    CHECK_SIGNATURE_VALID,
};
pub use verifier::{IntegrityVerifier, VerifyError, DEFAULT_INTEGRITY_THRESHOLD};
