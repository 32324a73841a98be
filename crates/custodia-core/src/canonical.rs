//! # Canonical Serialization: JCS-Compatible Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes used in
//! fingerprint computation across the engine.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which applies the
//! coercion pipeline (float rejection, key stringification) before JCS
//! serialization. Any function that fingerprints data must accept
//! `&CanonicalBytes`, so a non-canonical serialization path cannot reach a
//! hash function. A fingerprint mismatch in court must mean the payload
//! changed, never that two serializers disagreed about key order.
//!
//! ## Coercion Rules
//!
//! 1. **Reject floats.** Floats have non-deterministic JCS number
//!    serialization edge cases; counts must be integers, amounts strings.
//! 2. **Object keys are strings** (guaranteed by `serde_json::Map`).
//! 3. **Tuples and sequences serialize as JSON arrays.**
//! 4. **Datetimes normalize at the `Serialize` boundary** via the
//!    [`crate::temporal::Timestamp`] type: UTC ISO 8601, Z suffix, seconds
//!    precision.
//!
//! After coercion, serialization uses `serde_jcs` for RFC 8785 (JSON
//! Canonicalization Scheme) output: sorted keys, compact separators,
//! deterministic byte sequence.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with the Custodia
/// coercion rules.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - No float appears anywhere in the value tree.
/// - All object keys are strings; all timestamps are UTC with Z suffix.
/// - Serialization is RFC 8785: sorted keys, compact separators.
///
/// The inner `Vec<u8>` is private, so downstream code cannot violate these
/// invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the ONLY way to construct `CanonicalBytes`. All fingerprint
    /// computation in the engine must flow through this constructor.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains
    /// float numbers, or `CanonicalizationError::SerializationFailed` if
    /// JCS serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce_json_value(value)?;
        let bytes = serialize_canonical(&coerced)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for fingerprint computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively validate and coerce JSON values for canonicalization.
///
/// `null`, `bool`, `string`, and integer numbers pass through unchanged.
/// Non-integer floats are rejected. Objects and arrays recurse.
fn coerce_json_value(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce_json_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_json_value).collect();
            Ok(Value::Array(coerced?))
        }
    }
}

/// Serialize a JSON value in JCS-canonical form (RFC 8785): sorted keys,
/// compact separators, UTF-8 output.
fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}
