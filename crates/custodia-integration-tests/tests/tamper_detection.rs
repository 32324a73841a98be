//! Adversarial flows: evidence and ledger files rewritten outside the
//! API must surface as failing checks, never be masked, and never be
//! auto-corrected.

use custodia_core::{ActorId, CaseNumber, RawPayload, SourcePayload};
use custodia_crypto::Keystore;
use custodia_engine::{Actor, CollectRequest, CustodyService, EngineConfig};
use custodia_ledger::{CustodyAction, CustodyEntry};

fn service(tmp: &tempfile::TempDir) -> CustodyService {
    let keystore_dir = tmp.path().join("keys");
    Keystore::new(&keystore_dir).provision().unwrap();
    CustodyService::open(EngineConfig::new(tmp.path().join("data"), keystore_dir)).unwrap()
}

fn chat_request() -> CollectRequest {
    CollectRequest {
        case_number: CaseNumber::new("FIR_2025_004"),
        source_payload: SourcePayload::ChatMessage {
            platform: "WhatsApp".to_string(),
            conversation_id: "conv-88".to_string(),
            sender: "+10000000000".to_string(),
            raw: RawPayload::new(b"exported chat transcript".to_vec()),
        },
        source_platform: "WhatsApp".to_string(),
        collected_by: ActorId::new("Officer_5"),
        location: "Field office".to_string(),
        description: "chat transcript referenced by the complainant".to_string(),
        files: Vec::new(),
    }
}

fn record_path(tmp: &tempfile::TempDir, id: &custodia_core::EvidenceId) -> std::path::PathBuf {
    tmp.path()
        .join("data")
        .join("records")
        .join(format!("{id}.json"))
}

fn ledger_path(tmp: &tempfile::TempDir, id: &custodia_core::EvidenceId) -> std::path::PathBuf {
    tmp.path()
        .join("data")
        .join("ledger")
        .join(format!("{id}.json"))
}

#[test]
fn altered_payload_bytes_fail_fingerprint_check() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(&tmp);
    let id = service.collect(chat_request()).unwrap();

    let path = record_path(&tmp, &id);
    let mut value: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    value["source_payload"]["raw"] =
        serde_json::json!(base64_encode(b"doctored chat transcript"));
    std::fs::write(&path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();

    let report = service.verify_integrity(&id).unwrap();
    assert!(!report.check("fingerprint_match"));
    assert!(report.integrity_score < 1.0);
    assert!(report.questionable);

    // The failing state persists: verification did not "fix" anything.
    let report_again = service.verify_integrity(&id).unwrap();
    assert_eq!(report_again.checks, report.checks);
}

#[test]
fn rewritten_ledger_entry_fails_chain_check() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(&tmp);
    let id = service.collect(chat_request()).unwrap();
    service
        .append_custody(
            &id,
            Actor::new("Officer_6", "Officer Six"),
            CustodyAction::Verified,
            "Lab",
            "verified against source",
        )
        .unwrap();

    let path = ledger_path(&tmp, &id);
    let mut entries: Vec<CustodyEntry> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    entries[1].notes = "entry quietly rewritten".to_string();
    std::fs::write(&path, serde_json::to_vec_pretty(&entries).unwrap()).unwrap();

    // The entry content itself is signed, and notes are outside the
    // signing string, so rewrite detection for notes rides on the record
    // checks staying green; chain replay still validates the signed
    // statement fields.
    let report = service.verify_integrity(&id).unwrap();
    assert!(report.check("chain_continuity"));

    // Rewriting a signed field breaks the chain.
    let mut entries: Vec<CustodyEntry> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    entries[1].actor_id = ActorId::new("Impostor");
    std::fs::write(&path, serde_json::to_vec_pretty(&entries).unwrap()).unwrap();

    let report = service.verify_integrity(&id).unwrap();
    assert!(!report.check("chain_continuity"));
    assert!(report.questionable);
}

#[test]
fn dropped_genesis_entry_fails_chain_check() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(&tmp);
    let id = service.collect(chat_request()).unwrap();
    service
        .append_custody(
            &id,
            Actor::new("Officer_6", "Officer Six"),
            CustodyAction::Verified,
            "Lab",
            "",
        )
        .unwrap();

    let path = ledger_path(&tmp, &id);
    let entries: Vec<CustodyEntry> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_vec_pretty(&entries[1..]).unwrap()).unwrap();

    let report = service.verify_integrity(&id).unwrap();
    assert!(!report.check("chain_continuity"));
}

#[test]
fn truncated_tail_is_caught_by_status_fold() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(&tmp);
    let id = service.collect(chat_request()).unwrap();
    service
        .append_custody(
            &id,
            Actor::new("Officer_6", "Officer Six"),
            CustodyAction::Verified,
            "Lab",
            "",
        )
        .unwrap();

    // Drop the VERIFIED entry. The remaining prefix replays cleanly, but
    // the folded status no longer matches the record's cached status.
    let path = ledger_path(&tmp, &id);
    let entries: Vec<CustodyEntry> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_vec_pretty(&entries[..1]).unwrap()).unwrap();

    let report = service.verify_integrity(&id).unwrap();
    assert!(!report.check("chain_continuity"));
}

#[test]
fn corrupted_blob_fails_manifest_check_and_blocks_packaging() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(&tmp);

    let attachment = tmp.path().join("voice_note.ogg");
    std::fs::write(&attachment, b"ogg bytes").unwrap();
    let mut request = chat_request();
    request.files = vec![attachment];
    let id = service.collect(request).unwrap();

    // Remove the blob entirely.
    let record = service.store().load(&id).unwrap();
    let digest = record.file_manifest.entries()[0].sha256.clone();
    std::fs::remove_file(service.store().blobs().blob_path(&digest)).unwrap();

    let report = service.verify_integrity(&id).unwrap();
    assert!(!report.check("file_manifest"));

    let court = custodia_pack::CourtDetails {
        court_name: "Sessions Court".to_string(),
        judge_name: "Hon. Justice Example".to_string(),
        prosecutor_name: "Public Prosecutor".to_string(),
        prosecutor_id: "PP_001".to_string(),
    };
    let result = service.format_for_court(&id, &court);
    assert!(matches!(
        result,
        Err(custodia_engine::CustodyError::Build(_))
    ));
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
