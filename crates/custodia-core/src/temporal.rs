//! # Temporal Types: UTC-Only Timestamps and the Injected Clock
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds, and the
//! `Clock` trait through which the engine obtains wall-clock time.
//!
//! ## Security Invariant
//!
//! Timestamps participate in canonical signing strings, so their rendering
//! must be deterministic: UTC, Z suffix, no sub-seconds. Non-UTC inputs are
//! rejected at parse time rather than silently converted.
//!
//! The service layer never calls `Timestamp::now()` directly; it asks its
//! injected [`Clock`]. Tests substitute a fixed clock and get byte-stable
//! ledger entries.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing or constructing a timestamp.
#[derive(Error, Debug)]
pub enum TimestampError {
    /// Input was not valid RFC 3339.
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Input carried a non-Z timezone offset.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NonUtc(String),

    /// Epoch seconds out of representable range.
    #[error("invalid Unix timestamp: {0}")]
    InvalidEpoch(i64),
}

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Guarantees that every timestamp in the engine renders as
/// `YYYY-MM-DDTHH:MM:SSZ`, the form used inside canonical signing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    ///
    /// Production code paths should obtain time through a [`Clock`] rather
    /// than calling this directly.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse from an RFC 3339 string, rejecting non-UTC offsets.
    ///
    /// Only the `Z` suffix is accepted. Explicit offsets are rejected even
    /// when semantically equivalent (`+00:00`), because two renderings of
    /// one instant would fork the canonical byte stream.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::NonUtc(s.to_string()));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::InvalidFormat {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// From a Unix epoch timestamp in seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or(TimestampError::InvalidEpoch(secs))?;
        Ok(Self(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO 8601 with Z suffix, e.g. `2026-01-15T12:00:00Z`.
    ///
    /// This is the exact form embedded in canonical signing strings.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// A source of current time.
///
/// The collaborator contract for wall-clock access: the engine is handed a
/// clock at construction and never reads ambient time. Implementations must
/// be monotonic enough that successive custody entries for one evidence
/// item do not go backwards in a way that matters for ordering; the ledger
/// orders entries by sequence number, not timestamp, so a coarse system
/// clock is acceptable.
pub trait Clock: Send + Sync {
    /// The current instant, UTC, seconds precision.
    fn now(&self) -> Timestamp;
}

/// The production clock: reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(with_nanos);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn parse_offsets_rejected() {
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15T17:00:00+05:00").is_err());
        assert!(Timestamp::parse("2026-01-15T08:00:00-04:00").is_err());
    }

    #[test]
    fn parse_subseconds_truncated() {
        let ts = Timestamp::parse("2026-01-15T12:00:00.123456Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn parse_garbage_rejected() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-01-15").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn epoch_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let back = Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap();
        assert_eq!(ts, back);
    }

    #[test]
    fn ordering() {
        let earlier = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let later = Timestamp::parse("2026-01-15T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    #[test]
    fn system_clock_is_utc_seconds() {
        let ts = SystemClock.now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn midnight_format() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Timestamp::from_utc(dt).to_iso8601(), "2026-01-01T00:00:00Z");
    }
}
