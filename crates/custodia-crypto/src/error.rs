//! # Crypto Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Error in signing, verification, or digest operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key parsing or derivation failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Digest computation failed.
    #[error("digest error: {0}")]
    DigestError(String),

    /// IO error while hashing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error loading or provisioning the persistent keystore.
///
/// Every variant is fatal at service construction: the engine refuses to
/// start without a real asymmetric keypair. A pseudo-signature fallback
/// would void non-repudiation, so none exists.
#[derive(Error, Debug)]
pub enum KeystoreError {
    /// The keystore directory or a key file does not exist.
    #[error("keystore material not found at {path}: signing keys must be provisioned before the engine starts")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Key file contents are not a valid key.
    #[error("malformed key material in {path}: {reason}")]
    Malformed {
        /// The offending file.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },

    /// The stored public key does not match the private seed.
    #[error("public key on disk does not match the private key: keystore at {path} is inconsistent")]
    KeyMismatch {
        /// The keystore directory.
        path: PathBuf,
    },

    /// Refusing to overwrite existing key material.
    #[error("keystore already provisioned at {path}")]
    AlreadyProvisioned {
        /// The keystore directory.
        path: PathBuf,
    },

    /// IO error reading or writing key files.
    #[error("keystore io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error in the content-addressed blob store.
#[derive(Error, Debug)]
pub enum BlobError {
    /// A declared attachment path does not exist.
    #[error("missing file: {path}")]
    MissingFile {
        /// The declared path.
        path: PathBuf,
    },

    /// A stored blob is absent from the store.
    #[error("blob {digest} not present in store")]
    NotStored {
        /// The missing blob's hex digest.
        digest: String,
    },

    /// Hashing failed mid-stream.
    #[error(transparent)]
    Hash(#[from] CryptoError),

    /// IO error copying or reading blobs.
    #[error("blob io error: {0}")]
    Io(#[from] std::io::Error),
}
