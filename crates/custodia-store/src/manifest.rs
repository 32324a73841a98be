//! # File Manifest
//!
//! The ordered list of attachments belonging to an evidence record. The
//! manifest is the sole source of truth for file identity: each entry
//! names the file as declared at collection time and pins its content by
//! digest. Where the bytes physically live is the blob store's concern.

use serde::{Deserialize, Serialize};

/// One attached file: declared name, content digest, size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifestEntry {
    /// File name as declared at collection (relative, no directories).
    pub name: String,
    /// Lowercase hex SHA-256 of the file contents (64 chars).
    pub sha256: String,
    /// File size in bytes.
    pub size: u64,
}

/// The ordered manifest of an evidence record's attachments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileManifest(Vec<FileManifestEntry>);

impl FileManifest {
    /// An empty manifest.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an entry. Order is collection order and is preserved.
    pub fn push(&mut self, entry: FileManifestEntry) {
        self.0.push(entry);
    }

    /// The entries, in collection order.
    pub fn entries(&self) -> &[FileManifestEntry] {
        &self.0
    }

    /// Number of attached files.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attachments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total attachment bytes.
    pub fn total_size(&self) -> u64 {
        self.0.iter().map(|e| e.size).sum()
    }
}

impl<'a> IntoIterator for &'a FileManifest {
    type Item = &'a FileManifestEntry;
    type IntoIter = std::slice::Iter<'a, FileManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, size: u64) -> FileManifestEntry {
        FileManifestEntry {
            name: name.to_string(),
            sha256: "ab".repeat(32),
            size,
        }
    }

    #[test]
    fn preserves_collection_order() {
        let mut manifest = FileManifest::new();
        manifest.push(entry("b.png", 10));
        manifest.push(entry("a.png", 20));
        let names: Vec<&str> = manifest.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.png", "a.png"]);
    }

    #[test]
    fn total_size_sums_entries() {
        let mut manifest = FileManifest::new();
        manifest.push(entry("a", 10));
        manifest.push(entry("b", 32));
        assert_eq!(manifest.total_size(), 42);
        assert_eq!(manifest.len(), 2);
        assert!(!manifest.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let mut manifest = FileManifest::new();
        manifest.push(entry("capture.pcap", 1024));
        let json = serde_json::to_string(&manifest).unwrap();
        let back: FileManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }
}
