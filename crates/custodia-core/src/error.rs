//! # Core Error Types
//!
//! Errors shared across the workspace live here; each downstream crate
//! defines its own `thiserror` enum for its concern and converts into the
//! engine's top-level taxonomy at the service boundary.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations; use
    /// integers or strings.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
