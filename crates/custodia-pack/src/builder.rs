//! # The Court Package Builder
//!
//! Bundles everything a court needs into one archive:
//!
//! ```text
//! packages/{package_digest}.zip
//! ├── PACKAGE_MANIFEST.json
//! ├── documents/
//! │   ├── certificate_of_authenticity.txt
//! │   ├── technical_summary.txt
//! │   ├── custody_transcript.txt
//! │   └── evidence_summary.txt
//! ├── evidence_record.json
//! ├── source_payload.json          (canonical bytes)
//! ├── custody_ledger.json
//! ├── verification_report.json
//! └── files/{name}                 (one per manifest entry)
//! ```
//!
//! ## Content Addressing
//!
//! The package path is the canonical digest of the package manifest
//! (identifiers, fingerprints, ledger head, court details, per-document
//! digests), not of the zip bytes: the addressed content is the evidential
//! material, and zip container metadata stays out of the address.
//!
//! ## Atomicity
//!
//! The archive is assembled at `{path}.tmp` and renamed into place only
//! after `finish()` succeeds. A missing blob aborts the build before the
//! rename, so a partial archive is never visible at the final path.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use custodia_core::{sha256_hex, CanonicalBytes, CanonicalizationError};
use custodia_crypto::BlobStore;
use custodia_ledger::CustodyEntry;
use custodia_store::{
    ComplianceChecklist, EvidenceRecord, REQ_CUSTODY_MAINTAINED, REQ_INTEGRITY_PRESERVED,
    REQ_SIGNATURE_VALID, REQ_SOURCE_VERIFIED, REQ_TIMESTAMP_AUTHENTICATED,
};
use custodia_verify::{
    VerificationReport, CHECK_CHAIN_CONTINUITY, CHECK_FINGERPRINT_MATCH, CHECK_SIGNATURE_VALID,
};

use crate::documents;

/// Details of the receiving court, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtDetails {
    /// Name of the court.
    pub court_name: String,
    /// Presiding judge.
    pub judge_name: String,
    /// Prosecutor presenting the evidence.
    pub prosecutor_name: String,
    /// Prosecutor's identifier.
    pub prosecutor_id: String,
}

/// Errors from package assembly.
#[derive(Error, Debug)]
pub enum PackError {
    /// A manifest blob is absent from the blob store.
    #[error("package build failed: attachment {name} ({digest}) missing from blob store")]
    MissingBlob {
        /// Declared file name.
        name: String,
        /// Expected content digest.
        digest: String,
    },

    /// Payload or manifest could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// Archive assembly failed.
    #[error("package archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Serialization failure while rendering package data files.
    #[error("package serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error writing the archive.
    #[error("package io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Derive the compliance checklist from a verification report.
///
/// The timestamp requirement rides on the record signature: the collection
/// timestamp is part of the signed statement, so a valid signature
/// authenticates it.
pub fn checklist_from_report(report: &VerificationReport) -> ComplianceChecklist {
    let mut checklist = ComplianceChecklist::unmet();
    checklist.set(REQ_CUSTODY_MAINTAINED, report.check(CHECK_CHAIN_CONTINUITY));
    checklist.set(REQ_SIGNATURE_VALID, report.check(CHECK_SIGNATURE_VALID));
    checklist.set(
        REQ_TIMESTAMP_AUTHENTICATED,
        report.check(CHECK_SIGNATURE_VALID),
    );
    checklist.set(REQ_SOURCE_VERIFIED, report.check(CHECK_FINGERPRINT_MATCH));
    checklist.set(REQ_INTEGRITY_PRESERVED, report.all_passed());
    checklist
}

/// Builds sealed court submission packages.
#[derive(Debug, Clone)]
pub struct CourtPackageBuilder {
    packages_dir: PathBuf,
}

impl CourtPackageBuilder {
    /// Open (creating if needed) a builder writing under the given
    /// directory.
    pub fn open(packages_dir: impl Into<PathBuf>) -> Result<Self, PackError> {
        let packages_dir = packages_dir.into();
        std::fs::create_dir_all(&packages_dir)?;
        Ok(Self { packages_dir })
    }

    /// The output directory.
    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }

    /// Assemble the package and return its final path.
    ///
    /// Status preconditions and the SEALED ledger append are the service
    /// layer's responsibility; this function only builds the artifact.
    pub fn build(
        &self,
        record: &EvidenceRecord,
        entries: &[CustodyEntry],
        blobs: &BlobStore,
        court: &CourtDetails,
        report: &VerificationReport,
    ) -> Result<PathBuf, PackError> {
        // Gather attachment bytes first: a missing blob must abort before
        // anything is written.
        let mut attachments: Vec<(String, Vec<u8>)> = Vec::new();
        for entry in &record.file_manifest {
            if !blobs.contains(&entry.sha256) {
                return Err(PackError::MissingBlob {
                    name: entry.name.clone(),
                    digest: entry.sha256.clone(),
                });
            }
            let bytes = blobs.read(&entry.sha256).map_err(|_| PackError::MissingBlob {
                name: entry.name.clone(),
                digest: entry.sha256.clone(),
            })?;
            attachments.push((entry.name.clone(), bytes));
        }

        let checklist = checklist_from_report(report);
        let certificate = documents::render_certificate(record, entries, court, &checklist);
        let technical = documents::render_technical_summary(record, entries);
        let transcript = documents::render_custody_transcript(record, entries);
        let summary = documents::render_evidence_summary(record, entries, court);

        let payload_canonical = CanonicalBytes::new(&record.source_payload)?;
        let ledger_head = entries
            .last()
            .map(|e| e.entry_hash.clone())
            .unwrap_or_default();

        let document_digests = serde_json::json!({
            "certificate_of_authenticity.txt": sha256_hex(&CanonicalBytes::new(&certificate)?),
            "technical_summary.txt": sha256_hex(&CanonicalBytes::new(&technical)?),
            "custody_transcript.txt": sha256_hex(&CanonicalBytes::new(&transcript)?),
            "evidence_summary.txt": sha256_hex(&CanonicalBytes::new(&summary)?),
        });
        let manifest = serde_json::json!({
            "format": "custodia-court-package",
            "version": 1,
            "evidence_id": record.evidence_id,
            "case_number": record.case_number,
            "evidence_type": record.evidence_type,
            "original_fingerprint": record.original_fingerprint.to_hex(),
            "payload_sha256": sha256_hex(&payload_canonical),
            "ledger_head": ledger_head,
            "ledger_length": entries.len() as u64,
            "court": court,
            "documents": document_digests,
            "files": record.file_manifest,
            "checks_passed": report.checks_passed,
            "total_checks": report.total_checks,
            "verification_instructions":
                "Recompute the payload fingerprint from source_payload.json, verify the record \
                 signature, and replay custody_ledger.json from the genesis value to reproduce \
                 ledger_head.",
        });
        let package_digest = sha256_hex(&CanonicalBytes::new(&manifest)?);

        let final_path = self.packages_dir.join(format!("{package_digest}.zip"));
        let tmp_path = self.packages_dir.join(format!("{package_digest}.zip.tmp"));

        let file = std::fs::File::create(&tmp_path)?;
        let mut archive = zip::ZipWriter::new(file);

        fn write_entry(
            archive: &mut zip::ZipWriter<std::fs::File>,
            name: &str,
            bytes: &[u8],
        ) -> Result<(), PackError> {
            // Fixed modification time keeps archive bytes independent of
            // build time.
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated)
                .last_modified_time(zip::DateTime::default());
            archive.start_file(name, options)?;
            archive.write_all(bytes)?;
            Ok(())
        }

        write_entry(
            &mut archive,
            "PACKAGE_MANIFEST.json",
            &serde_json::to_vec_pretty(&manifest)?,
        )?;
        write_entry(
            &mut archive,
            "documents/certificate_of_authenticity.txt",
            certificate.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            "documents/technical_summary.txt",
            technical.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            "documents/custody_transcript.txt",
            transcript.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            "documents/evidence_summary.txt",
            summary.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            "evidence_record.json",
            &serde_json::to_vec_pretty(record)?,
        )?;
        write_entry(&mut archive, "source_payload.json", payload_canonical.as_bytes())?;
        write_entry(
            &mut archive,
            "custody_ledger.json",
            &serde_json::to_vec_pretty(&entries)?,
        )?;
        write_entry(
            &mut archive,
            "verification_report.json",
            &serde_json::to_vec_pretty(report)?,
        )?;
        for (name, bytes) in &attachments {
            write_entry(&mut archive, &format!("files/{name}"), bytes)?;
        }

        archive.finish()?;
        std::fs::rename(&tmp_path, &final_path)?;

        tracing::info!(
            evidence_id = %record.evidence_id,
            package = %final_path.display(),
            entries = entries.len(),
            attachments = attachments.len(),
            "court package assembled"
        );
        Ok(final_path)
    }
}
