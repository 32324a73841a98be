//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the engine's identifiers. Type-level distinction
//! prevents cross-namespace confusion: an `ActorId` cannot be passed where
//! an `EvidenceId` is expected, and a case number is never just a string
//! that happens to look like one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single piece of collected evidence.
///
/// Assigned once at collection time and never reused. Renders as the bare
/// hyphenated UUID inside canonical signing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceId(pub Uuid);

/// The case (investigation file) an evidence item belongs to,
/// e.g. `FIR_2025_001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseNumber(pub String);

/// Identifier of a human or system actor handling evidence,
/// e.g. a badge number or service account name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl EvidenceId {
    /// Generate a new random evidence identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse from the hyphenated UUID string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EvidenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseNumber {
    /// Wrap a case number string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The case number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ActorId {
    /// Wrap an actor identifier string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The actor id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CaseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
