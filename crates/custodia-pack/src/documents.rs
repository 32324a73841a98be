//! # Court Document Rendering
//!
//! Plain-text renderers for the four documents in a submission package.
//! Inputs are the evidence record, the custody chain, the court details,
//! and the evaluated compliance checklist; nothing else. No clock, no
//! randomness: the "date" on every document is the timestamp of the most
//! recent custody entry, which is data already in the ledger.

use custodia_ledger::CustodyEntry;
use custodia_store::{ComplianceChecklist, EvidenceRecord};

use crate::builder::CourtDetails;

const RULE: &str =
    "================================================================================";

fn prepared_at(entries: &[CustodyEntry]) -> String {
    entries
        .last()
        .map(|e| e.timestamp.to_iso8601())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// The certificate of authenticity: the collector's attestation that the
/// evidence is what the record says it is, with the technical anchors a
/// court needs to re-verify the claim.
pub fn render_certificate(
    record: &EvidenceRecord,
    entries: &[CustodyEntry],
    court: &CourtDetails,
    checklist: &ComplianceChecklist,
) -> String {
    let mut out = String::new();
    out.push_str("CERTIFICATE OF AUTHENTICITY FOR DIGITAL EVIDENCE\n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&format!("Case Number:    {}\n", record.case_number));
    out.push_str(&format!("Evidence ID:    {}\n", record.evidence_id));
    out.push_str(&format!("Court:          {}\n", court.court_name));
    out.push_str(&format!("Presiding:      {}\n", court.judge_name));
    out.push_str(&format!("Prepared:       {}\n\n", prepared_at(entries)));

    out.push_str(&format!(
        "I, {}, being the officer responsible for the collection and preservation\n\
         of the digital evidence identified above, certify that:\n\n",
        record.collected_by
    ));
    out.push_str(
        "1. The evidence was collected by the system in the ordinary course of\n\
         \x20  operation and fingerprinted at the moment of collection;\n\
         2. The fingerprint below was computed over the canonical form of the\n\
         \x20  collected payload and has not been rewritten since;\n\
         3. Every handling event since collection is recorded in the attached\n\
         \x20  chain-of-custody transcript, each entry individually signed and\n\
         \x20  hash-chained to its predecessor;\n\
         4. The digital signature below binds the evidence identifier, case\n\
         \x20  number, collection time, and fingerprint under the system's\n\
         \x20  signing key.\n\n",
    );

    out.push_str("TECHNICAL DETAILS\n");
    out.push_str(&format!(
        "  Original Fingerprint:  {}\n",
        record.original_fingerprint
    ));
    out.push_str(&format!("  Signature:             {}\n", record.signature));
    out.push_str(&format!(
        "  Collected At:          {}\n",
        record.collected_at.to_iso8601()
    ));
    out.push_str(&format!("  Evidence Type:         {}\n", record.evidence_type));
    out.push_str(&format!(
        "  Source Platform:       {}\n\n",
        record.source_platform
    ));

    out.push_str("COMPLIANCE CHECKLIST\n");
    for (requirement, met) in checklist.entries() {
        out.push_str(&format!(
            "  [{}] {}\n",
            if met { "x" } else { " " },
            requirement
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "Certifying Officer: {}\nPresented by:       {} ({})\n",
        record.collected_by, court.prosecutor_name, court.prosecutor_id
    ));
    out
}

/// The technical summary: what was computed, with which algorithms, and
/// how a third party can re-verify each claim.
pub fn render_technical_summary(record: &EvidenceRecord, entries: &[CustodyEntry]) -> String {
    let mut out = String::new();
    out.push_str("TECHNICAL SUMMARY\n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&format!("Evidence ID:  {}\n", record.evidence_id));
    out.push_str(&format!("Case Number:  {}\n\n", record.case_number));

    out.push_str("FINGERPRINT\n");
    out.push_str(
        "  The source payload is serialized in canonical form (RFC 8785 JSON,\n\
         \x20 sorted keys, UTC timestamps) and hashed with SHA-256. Recomputing\n\
         \x20 this hash over the payload in this package must reproduce:\n",
    );
    out.push_str(&format!("    {}\n\n", record.original_fingerprint));

    out.push_str("SIGNATURE\n");
    out.push_str(
        "  Ed25519 over the canonical statement\n\
         \x20   evidence_id:case_number:collected_at:fingerprint\n",
    );
    out.push_str(&format!("  Signature: {}\n\n", record.signature));

    out.push_str("CHAIN OF CUSTODY\n");
    out.push_str(&format!(
        "  {} entries. Each entry is signed and carries\n\
         \x20 SHA-256(canonical_entry_content || previous_entry_hash); the first\n\
         \x20 entry chains from the fixed genesis value. Replaying the transcript\n\
         \x20 reproduces the head hash:\n",
        entries.len()
    ));
    let head = entries
        .last()
        .map(|e| e.entry_hash.clone())
        .unwrap_or_default();
    out.push_str(&format!("    {head}\n\n"));

    out.push_str("ATTACHMENTS\n");
    if record.file_manifest.is_empty() {
        out.push_str("  None.\n");
    } else {
        for entry in &record.file_manifest {
            out.push_str(&format!(
                "  {}  {}  ({} bytes)\n",
                entry.sha256, entry.name, entry.size
            ));
        }
    }
    out
}

/// The full custody transcript: one block per ledger entry.
pub fn render_custody_transcript(record: &EvidenceRecord, entries: &[CustodyEntry]) -> String {
    let mut out = String::new();
    out.push_str("CHAIN OF CUSTODY TRANSCRIPT\n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&format!("Evidence ID:     {}\n", record.evidence_id));
    out.push_str(&format!("Custody Entries: {}\n\n", entries.len()));

    for entry in entries {
        out.push_str(&format!("Entry #{}\n", entry.sequence));
        out.push_str(&format!("  Timestamp:  {}\n", entry.timestamp.to_iso8601()));
        out.push_str(&format!(
            "  Actor:      {} ({})\n",
            entry.actor_name, entry.actor_id
        ));
        out.push_str(&format!("  Action:     {}\n", entry.action));
        out.push_str(&format!("  Location:   {}\n", entry.location));
        if !entry.notes.is_empty() {
            out.push_str(&format!("  Notes:      {}\n", entry.notes));
        }
        out.push_str(&format!("  Prev Hash:  {}\n", entry.prev_hash));
        out.push_str(&format!("  Entry Hash: {}\n", entry.entry_hash));
        out.push_str(&format!("  Signature:  {}\n\n", entry.entry_signature));
    }

    out.push_str(
        "Every entry above is individually signed; each entry hash covers the\n\
         entry content and the preceding hash, so removing, reordering, or\n\
         editing any entry breaks the chain at that point.\n",
    );
    out
}

/// The evidence summary: a one-page overview for non-technical readers.
pub fn render_evidence_summary(
    record: &EvidenceRecord,
    entries: &[CustodyEntry],
    court: &CourtDetails,
) -> String {
    let mut out = String::new();
    out.push_str("DIGITAL EVIDENCE SUMMARY\n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str("CASE INFORMATION\n");
    out.push_str(&format!("  Case Number:   {}\n", record.case_number));
    out.push_str(&format!("  Evidence ID:   {}\n", record.evidence_id));
    out.push_str(&format!("  Court:         {}\n\n", court.court_name));

    out.push_str("COLLECTION\n");
    out.push_str(&format!(
        "  Collected At:  {}\n",
        record.collected_at.to_iso8601()
    ));
    out.push_str(&format!("  Collected By:  {}\n", record.collected_by));
    out.push_str(&format!("  Location:      {}\n", record.location_collected));
    out.push_str(&format!("  Type:          {}\n", record.evidence_type));
    out.push_str(&format!("  Platform:      {}\n\n", record.source_platform));

    out.push_str("DESCRIPTION\n");
    out.push_str(&format!("  {}\n\n", record.description));

    out.push_str("STATUS\n");
    out.push_str(&format!("  Current Status:   {}\n", record.status));
    out.push_str(&format!("  Custody Entries:  {}\n", entries.len()));
    out.push_str(&format!(
        "  Attached Files:   {}\n\n",
        record.file_manifest.len()
    ));

    out.push_str(
        "This package contains the original payload, all attached files, the\n\
         complete custody transcript, and the cryptographic material needed to\n\
         independently re-verify every integrity claim made above.\n",
    );
    out
}
