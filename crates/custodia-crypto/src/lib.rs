//! # custodia-crypto: Cryptographic Services
//!
//! The signing and hashing layer of the evidence engine:
//!
//! - [`ed25519`]: Ed25519 keys, signatures, and the [`EvidenceSigner`]
//!   that signs only canonical [`SigningInput`](custodia_core::SigningInput)
//!   strings.
//! - [`keystore`]: loads the persisted keypair at process start. A missing
//!   or malformed keypair is a hard error; there is no degraded signing
//!   mode of any kind.
//! - [`filehash`]: streaming SHA-256 of attachment files.
//! - [`blob`]: the content-addressed store for attached files, keyed by
//!   digest and decoupled from any case or evidence naming.

pub mod blob;
pub mod ed25519;
pub mod error;
pub mod filehash;
pub mod keystore;

pub use blob::{BlobRef, BlobStore};
pub use ed25519::{verify_signature, Ed25519PublicKey, Ed25519Signature, EvidenceSigner};
pub use error::{BlobError, CryptoError, KeystoreError};
pub use filehash::stream_sha256;
pub use keystore::Keystore;
