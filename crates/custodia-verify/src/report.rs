//! # The Verification Report
//!
//! The scored outcome of an integrity verification: one named boolean per
//! check, the pass count, and the equal-weighted integrity score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use custodia_core::{EvidenceId, Timestamp};

/// Check: the recomputed payload fingerprint equals the original.
pub const CHECK_FINGERPRINT_MATCH: &str = "fingerprint_match";
/// Check: the record signature verifies over the canonical signing string.
pub const CHECK_SIGNATURE_VALID: &str = "signature_valid";
/// Check: the custody chain replays intact from genesis.
pub const CHECK_CHAIN_CONTINUITY: &str = "chain_continuity";
/// Check: every manifest entry's blob re-hashes to its recorded digest.
pub const CHECK_FILE_MANIFEST: &str = "file_manifest";

/// The outcome of one integrity verification run.
///
/// Scoring is equal-weighted and no check is ever skipped: a check with
/// nothing to examine (e.g. an empty manifest) passes trivially rather
/// than shrinking the denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// The verified evidence item.
    pub evidence_id: EvidenceId,
    /// When the verification ran.
    pub verified_at: Timestamp,
    /// Named check outcomes, sorted by name.
    pub checks: BTreeMap<String, bool>,
    /// Number of checks that passed.
    pub checks_passed: u32,
    /// Total number of checks.
    pub total_checks: u32,
    /// `checks_passed / total_checks`.
    pub integrity_score: f64,
    /// Whether the score fell below the configured threshold.
    pub questionable: bool,
}

impl VerificationReport {
    /// Start an empty report.
    pub fn begin(evidence_id: EvidenceId, verified_at: Timestamp) -> Self {
        Self {
            evidence_id,
            verified_at,
            checks: BTreeMap::new(),
            checks_passed: 0,
            total_checks: 0,
            integrity_score: 0.0,
            questionable: false,
        }
    }

    /// Record one check outcome.
    pub fn record(&mut self, check: &str, passed: bool) {
        self.checks.insert(check.to_string(), passed);
    }

    /// Recompute counters and score, and flag `questionable` against the
    /// threshold.
    pub fn finalize(&mut self, threshold: f64) {
        self.total_checks = self.checks.len() as u32;
        self.checks_passed = self.checks.values().filter(|v| **v).count() as u32;
        self.integrity_score = if self.total_checks == 0 {
            0.0
        } else {
            f64::from(self.checks_passed) / f64::from(self.total_checks)
        };
        self.questionable = self.integrity_score < threshold;
    }

    /// Whether a named check passed (absent counts as failed).
    pub fn check(&self, name: &str) -> bool {
        self.checks.get(name).copied().unwrap_or(false)
    }

    /// Whether every check passed.
    pub fn all_passed(&self) -> bool {
        self.total_checks > 0 && self.checks_passed == self.total_checks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(outcomes: &[(&str, bool)]) -> VerificationReport {
        let mut report = VerificationReport::begin(
            EvidenceId::new(),
            Timestamp::parse("2026-02-01T08:00:00Z").unwrap(),
        );
        for (name, passed) in outcomes {
            report.record(name, *passed);
        }
        report.finalize(0.8);
        report
    }

    #[test]
    fn all_passing_scores_one() {
        let report = report_with(&[
            (CHECK_FINGERPRINT_MATCH, true),
            (CHECK_SIGNATURE_VALID, true),
            (CHECK_CHAIN_CONTINUITY, true),
            (CHECK_FILE_MANIFEST, true),
        ]);
        assert_eq!(report.checks_passed, 4);
        assert_eq!(report.total_checks, 4);
        assert_eq!(report.integrity_score, 1.0);
        assert!(!report.questionable);
        assert!(report.all_passed());
    }

    #[test]
    fn one_failure_drops_below_threshold() {
        let report = report_with(&[
            (CHECK_FINGERPRINT_MATCH, false),
            (CHECK_SIGNATURE_VALID, true),
            (CHECK_CHAIN_CONTINUITY, true),
            (CHECK_FILE_MANIFEST, true),
        ]);
        assert_eq!(report.checks_passed, 3);
        assert_eq!(report.integrity_score, 0.75);
        assert!(report.questionable);
        assert!(!report.check(CHECK_FINGERPRINT_MATCH));
    }

    #[test]
    fn threshold_is_strict_less_than() {
        let mut report = report_with(&[
            ("a", true),
            ("b", true),
            ("c", true),
            ("d", true),
            ("e", false),
        ]);
        report.finalize(0.8);
        // 4/5 = 0.8 exactly: not below the threshold.
        assert_eq!(report.integrity_score, 0.8);
        assert!(!report.questionable);
    }

    #[test]
    fn absent_check_counts_as_failed() {
        let report = report_with(&[(CHECK_SIGNATURE_VALID, true)]);
        assert!(!report.check(CHECK_FINGERPRINT_MATCH));
    }

    #[test]
    fn serde_roundtrip() {
        let report = report_with(&[(CHECK_SIGNATURE_VALID, true), (CHECK_FILE_MANIFEST, false)]);
        let json = serde_json::to_string(&report).unwrap();
        let back: VerificationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
