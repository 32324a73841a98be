//! # The Custody Service
//!
//! One [`CustodyService`] per process. Collaborators (store, ledger,
//! signer, verifier, packager, clock) are constructed once at `open()` and
//! injected; nothing is held in ambient or session state.
//!
//! ## Operation Semantics
//!
//! - `collect` validates inputs before creating any state, ingests
//!   attachments, fingerprints and signs the record, persists it, and
//!   writes the genesis custody entry.
//! - `append_custody` reads the chain head, then appends under the
//!   ledger's optimistic-concurrency check; a lost race surfaces as
//!   `ConcurrentModification` and the caller retries.
//! - `verify_integrity` is read-only and returns the scored report; it
//!   never mutates a record, however badly the checks fail.
//! - `format_for_court` requires COLLECTED or VERIFIED status, builds the
//!   archive atomically, then appends the SEALED entry.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use custodia_core::{
    sha256_digest, ActorId, CanonicalBytes, CaseNumber, Clock, EvidenceId, SigningInput,
    SourcePayload, SystemClock,
};
use custodia_crypto::{Ed25519PublicKey, EvidenceSigner, Keystore};
use custodia_ledger::{
    AppendRequest, CustodyAction, CustodyEntry, CustodyLedger, EvidenceStatus, GENESIS_HASH,
};
use custodia_pack::{CourtDetails, CourtPackageBuilder};
use custodia_store::{ComplianceChecklist, EvidenceRecord, EvidenceStore};
use custodia_verify::{IntegrityVerifier, VerificationReport};

use crate::config::EngineConfig;
use crate::error::CustodyError;

/// Who is performing a custody action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Badge number, service account, or other identifier.
    pub actor_id: ActorId,
    /// Human-readable name.
    pub actor_name: String,
}

impl Actor {
    /// Convenience constructor.
    pub fn new(actor_id: impl Into<String>, actor_name: impl Into<String>) -> Self {
        Self {
            actor_id: ActorId::new(actor_id),
            actor_name: actor_name.into(),
        }
    }
}

/// Input to [`CustodyService::collect`].
#[derive(Debug, Clone)]
pub struct CollectRequest {
    /// The case this evidence belongs to. Required.
    pub case_number: CaseNumber,
    /// What was collected; the evidence type is derived from the variant.
    pub source_payload: SourcePayload,
    /// The platform or system the evidence came from.
    pub source_platform: String,
    /// Who collected it. Required.
    pub collected_by: ActorId,
    /// Where it was collected. Required.
    pub location: String,
    /// Free-form description. Required.
    pub description: String,
    /// Paths of files to attach; each must exist.
    pub files: Vec<PathBuf>,
}

/// Inventory counts across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    /// Number of evidence records.
    pub total_items: u64,
    /// Record counts keyed by status name.
    pub by_status: BTreeMap<String, u64>,
    /// Record counts keyed by evidence type name.
    pub by_type: BTreeMap<String, u64>,
    /// Total custody entries across all chains.
    pub custody_entries: u64,
}

/// The evidence custody engine.
pub struct CustodyService {
    config: EngineConfig,
    store: EvidenceStore,
    ledger: CustodyLedger,
    signer: EvidenceSigner,
    verifier: IntegrityVerifier,
    packager: CourtPackageBuilder,
    clock: Arc<dyn Clock>,
}

impl CustodyService {
    /// Construct the service.
    ///
    /// Loads the signing keypair from the configured keystore; a missing
    /// or malformed keystore is a fatal error here, by design. Creates the
    /// data directories if absent.
    pub fn open(config: EngineConfig) -> Result<Self, CustodyError> {
        let signer = Keystore::new(&config.keystore_dir).load()?;
        let store = EvidenceStore::open(&config.data_dir)?;
        let ledger = CustodyLedger::open(config.ledger_dir())?;
        let packager = CourtPackageBuilder::open(config.packages_dir())?;
        let verifier = IntegrityVerifier::new(config.integrity_threshold);

        tracing::info!(
            data_dir = %config.data_dir.display(),
            threshold = config.integrity_threshold,
            "custody service ready"
        );
        Ok(Self {
            config,
            store,
            ledger,
            signer,
            verifier,
            packager,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock, e.g. with a fixed clock in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The service's signature verification key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.signer.public_key()
    }

    /// Read access to the evidence store.
    pub fn store(&self) -> &EvidenceStore {
        &self.store
    }

    /// Read access to the custody ledger.
    pub fn ledger(&self) -> &CustodyLedger {
        &self.ledger
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register and fingerprint new evidence; returns the new id.
    ///
    /// Input validation happens first: an empty required field rejects the
    /// request with `InvalidInput` before any state exists. Attachment
    /// ingestion is next, so a `MissingFile` also leaves nothing behind.
    pub fn collect(&self, request: CollectRequest) -> Result<EvidenceId, CustodyError> {
        require_nonempty("case_number", request.case_number.as_str())?;
        require_nonempty("collected_by", request.collected_by.as_str())?;
        require_nonempty("location", &request.location)?;
        require_nonempty("description", &request.description)?;

        let file_manifest = self.store.attach_files(&request.files)?;

        let canonical = CanonicalBytes::new(&request.source_payload)?;
        let original_fingerprint = sha256_digest(&canonical);

        let evidence_id = EvidenceId::new();
        let collected_at = self.clock.now();
        let signature = self.signer.sign(&SigningInput::for_record(
            &evidence_id,
            &request.case_number,
            &collected_at,
            &original_fingerprint,
        ));

        let record = EvidenceRecord {
            evidence_id,
            case_number: request.case_number,
            evidence_type: request.source_payload.evidence_type(),
            source_platform: request.source_platform,
            collected_by: request.collected_by.clone(),
            collected_at,
            location_collected: request.location.clone(),
            description: request.description.clone(),
            source_payload: request.source_payload,
            original_fingerprint,
            signature,
            status: EvidenceStatus::Collected,
            file_manifest,
            compliance_checklist: ComplianceChecklist::unmet(),
        };
        self.store.insert(&record)?;

        self.ledger.append(
            &evidence_id,
            AppendRequest {
                actor_id: request.collected_by,
                actor_name: record.collected_by.as_str().to_string(),
                action: CustodyAction::Collected,
                location: request.location,
                notes: request.description,
            },
            GENESIS_HASH,
            &self.signer,
            collected_at,
        )?;

        tracing::info!(
            evidence_id = %evidence_id,
            case_number = %record.case_number,
            evidence_type = %record.evidence_type,
            attachments = record.file_manifest.len(),
            "evidence collected"
        );
        Ok(evidence_id)
    }

    /// Record a handling event on an evidence item's custody chain.
    ///
    /// Fails with `NotFound` for an unknown id, `InvalidTransition` for an
    /// action that is not legal from the current status, and
    /// `ConcurrentModification` when another append won the race; the
    /// caller rereads by simply calling again.
    pub fn append_custody(
        &self,
        evidence_id: &EvidenceId,
        actor: Actor,
        action: CustodyAction,
        location: &str,
        notes: &str,
    ) -> Result<CustodyEntry, CustodyError> {
        // Existence check against the record table; the ledger alone
        // cannot distinguish "unknown id" from "no history yet".
        self.store.load(evidence_id)?;

        let head = self.ledger.head(evidence_id)?;
        let entry = self.ledger.append(
            evidence_id,
            AppendRequest {
                actor_id: actor.actor_id,
                actor_name: actor.actor_name,
                action,
                location: location.to_string(),
                notes: notes.to_string(),
            },
            &head,
            &self.signer,
            self.clock.now(),
        )?;

        if let Some(status) = entry.action.target_status() {
            self.store.update_status(evidence_id, status)?;
        }
        Ok(entry)
    }

    /// Re-derive every integrity claim for an evidence item.
    ///
    /// Strictly read-only: a failing record keeps its failing report and
    /// is never auto-corrected.
    pub fn verify_integrity(
        &self,
        evidence_id: &EvidenceId,
    ) -> Result<VerificationReport, CustodyError> {
        Ok(self.verifier.verify(
            &self.store,
            &self.ledger,
            &self.signer.public_key(),
            evidence_id,
            self.clock.now(),
        )?)
    }

    /// Build the sealed court submission package and transition the record
    /// to SEALED.
    ///
    /// Requires status COLLECTED or VERIFIED. The archive lands at a
    /// content-addressed path via temp-write and atomic rename before the
    /// SEALED entry is appended, so an interrupted build never leaves a
    /// partial package or a dangling transition.
    pub fn format_for_court(
        &self,
        evidence_id: &EvidenceId,
        court: &CourtDetails,
    ) -> Result<PathBuf, CustodyError> {
        let record = self.store.load(evidence_id)?;
        if !matches!(
            record.status,
            EvidenceStatus::Collected | EvidenceStatus::Verified
        ) {
            return Err(CustodyError::InvalidTransition {
                from: record.status.to_string(),
                action: CustodyAction::Sealed.to_string(),
            });
        }

        let entries = self.ledger.entries(evidence_id)?;
        let report = self.verifier.verify(
            &self.store,
            &self.ledger,
            &self.signer.public_key(),
            evidence_id,
            self.clock.now(),
        )?;

        let package_path =
            self.packager
                .build(&record, &entries, self.store.blobs(), court, &report)?;

        let head = self.ledger.head(evidence_id)?;
        self.ledger.append(
            evidence_id,
            AppendRequest {
                actor_id: ActorId::new(court.prosecutor_id.clone()),
                actor_name: court.prosecutor_name.clone(),
                action: CustodyAction::Sealed,
                location: court.court_name.clone(),
                notes: format!(
                    "court package {}",
                    package_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                ),
            },
            &head,
            &self.signer,
            self.clock.now(),
        )?;
        self.store.update_status(evidence_id, EvidenceStatus::Sealed)?;

        tracing::info!(
            evidence_id = %evidence_id,
            package = %package_path.display(),
            court = %court.court_name,
            "evidence sealed for court submission"
        );
        Ok(package_path)
    }

    /// Inventory counts across all records and chains.
    pub fn summary(&self) -> Result<EvidenceSummary, CustodyError> {
        let mut summary = EvidenceSummary {
            total_items: 0,
            by_status: BTreeMap::new(),
            by_type: BTreeMap::new(),
            custody_entries: 0,
        };
        for evidence_id in self.store.evidence_ids()? {
            let record = self.store.load(&evidence_id)?;
            summary.total_items += 1;
            *summary
                .by_status
                .entry(record.status.to_string())
                .or_default() += 1;
            *summary
                .by_type
                .entry(record.evidence_type.to_string())
                .or_default() += 1;
            summary.custody_entries += self.ledger.len(&evidence_id)?;
        }
        Ok(summary)
    }
}

impl std::fmt::Debug for CustodyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustodyService")
            .field("data_dir", &self.config.data_dir)
            .field("threshold", &self.config.integrity_threshold)
            .finish_non_exhaustive()
    }
}

fn require_nonempty(field: &'static str, value: &str) -> Result<(), CustodyError> {
    if value.trim().is_empty() {
        return Err(CustodyError::InvalidInput { field });
    }
    Ok(())
}
