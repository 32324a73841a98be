//! # Persistent Keystore
//!
//! Loads the engine's Ed25519 keypair from disk at service construction.
//!
//! ## Layout
//!
//! - `{dir}/evidence.key`: the 32-byte private seed, 64 lowercase hex chars.
//! - `{dir}/evidence.pub`: the 32-byte public key, 64 lowercase hex chars,
//!   cross-checked against the seed on every load.
//!
//! ## Security Invariant
//!
//! Loading is all-or-nothing. A missing directory, missing file, malformed
//! hex, or a public key that does not match the seed is a fatal
//! [`KeystoreError`]. The engine never generates an implicit key and never
//! substitutes a hash for a signature: an unsigned or pseudo-signed
//! evidence record has no evidentiary value, so refusing to start is the
//! only safe behavior.
//!
//! Provisioning is explicit: [`Keystore::provision()`] creates a fresh
//! keypair exactly once and refuses to overwrite existing material.

use std::path::{Path, PathBuf};

use zeroize::Zeroize;

use crate::ed25519::{hex_to_bytes, EvidenceSigner};
use crate::error::KeystoreError;

const PRIVATE_KEY_FILE: &str = "evidence.key";
const PUBLIC_KEY_FILE: &str = "evidence.pub";

/// The on-disk keystore for the engine's signing keypair.
#[derive(Debug, Clone)]
pub struct Keystore {
    dir: PathBuf,
}

impl Keystore {
    /// Point at a keystore directory. No IO happens until `load` or
    /// `provision`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The keystore directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn private_key_path(&self) -> PathBuf {
        self.dir.join(PRIVATE_KEY_FILE)
    }

    fn public_key_path(&self) -> PathBuf {
        self.dir.join(PUBLIC_KEY_FILE)
    }

    /// Load the persisted keypair.
    ///
    /// # Errors
    ///
    /// Fatal on any defect: missing files, malformed hex, wrong lengths,
    /// or a stored public key that does not match the private seed.
    pub fn load(&self) -> Result<EvidenceSigner, KeystoreError> {
        let key_path = self.private_key_path();
        if !key_path.exists() {
            return Err(KeystoreError::NotFound { path: key_path });
        }
        let pub_path = self.public_key_path();
        if !pub_path.exists() {
            return Err(KeystoreError::NotFound { path: pub_path });
        }

        let mut seed = read_hex_32(&key_path)?;
        let signer = EvidenceSigner::from_seed(&seed);
        seed.zeroize();

        let stored_pub = read_hex_32(&pub_path)?;
        if signer.public_key().as_bytes() != &stored_pub {
            return Err(KeystoreError::KeyMismatch {
                path: self.dir.clone(),
            });
        }

        tracing::info!(
            path = %self.dir.display(),
            public_key = %signer.public_key(),
            "loaded evidence signing keypair"
        );
        Ok(signer)
    }

    /// Generate and persist a fresh keypair.
    ///
    /// Refuses to overwrite existing key material: re-provisioning over a
    /// live keystore would orphan every signature already on disk.
    pub fn provision(&self) -> Result<EvidenceSigner, KeystoreError> {
        if self.private_key_path().exists() || self.public_key_path().exists() {
            return Err(KeystoreError::AlreadyProvisioned {
                path: self.dir.clone(),
            });
        }
        std::fs::create_dir_all(&self.dir)?;

        let signer = EvidenceSigner::generate();
        let mut seed_hex: String = signer
            .seed_bytes()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        std::fs::write(self.private_key_path(), format!("{seed_hex}\n"))?;
        seed_hex.zeroize();
        std::fs::write(
            self.public_key_path(),
            format!("{}\n", signer.public_key().to_hex()),
        )?;

        tracing::info!(
            path = %self.dir.display(),
            public_key = %signer.public_key(),
            "provisioned new evidence signing keypair"
        );
        Ok(signer)
    }
}

/// Read a file expected to contain exactly 64 hex chars (32 bytes).
fn read_hex_32(path: &Path) -> Result<[u8; 32], KeystoreError> {
    let contents = std::fs::read_to_string(path)?;
    let hex = contents.trim();
    if hex.len() != 64 {
        return Err(KeystoreError::Malformed {
            path: path.to_path_buf(),
            reason: format!("expected 64 hex chars, got {}", hex.len()),
        });
    }
    let bytes = hex_to_bytes(hex).map_err(|reason| KeystoreError::Malformed {
        path: path.to_path_buf(),
        reason,
    })?;
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}
