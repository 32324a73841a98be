//! # Streaming File Hashing
//!
//! SHA-256 over attachment files, streamed in fixed-size chunks. Evidence
//! attachments can be multi-gigabyte video files; the hash loop holds one
//! 64 KiB buffer regardless of file size, and an abandoned call simply
//! drops its partial state.

use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::CryptoError;

const CHUNK_SIZE: usize = 64 * 1024;

/// The digest and size of a hashed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// Lowercase hex SHA-256 (64 chars).
    pub sha256: String,
    /// File size in bytes.
    pub size: u64,
}

/// Stream a file through SHA-256.
///
/// Reads in 64 KiB chunks; never loads the whole file into memory.
pub fn stream_sha256(path: &Path) -> Result<FileDigest, CryptoError> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    let mut size: u64 = 0;
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }
    let digest = hasher.finalize();
    let sha256 = digest.iter().map(|b| format!("{b:02x}")).collect();
    Ok(FileDigest { sha256, size })
}
