//! # Evidence Payload Model
//!
//! Defines the fixed `EvidenceType` enumeration and `SourcePayload`, the
//! tagged union that carries what was actually collected.
//!
//! ## Design
//!
//! Every payload variant pairs a small set of type-specific metadata fields
//! with exactly one opaque [`RawPayload`]: the true external bytes as they
//! came off the platform (an API response body, a PNG, an EML file, a log
//! slice). The union is closed over the ten evidence types, so
//! canonicalization for fingerprinting is total: there is no "unknown dict"
//! shape whose serialization could drift between writers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The fixed enumeration of digital evidence types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    /// A post on a social platform (tweet, status update, share).
    SocialMediaPost,
    /// A captured screen image.
    Screenshot,
    /// A single message from a chat or messaging platform.
    ChatMessage,
    /// An email message.
    Email,
    /// A document file (PDF, office formats, plain text).
    Document,
    /// An audio recording.
    Audio,
    /// A video recording.
    Video,
    /// A capture or excerpt of network traffic logs.
    NetworkLog,
    /// A row or result set exported from a database.
    DatabaseRecord,
    /// An operating-system or application log slice.
    SystemLog,
}

impl EvidenceType {
    /// Stable identifier string, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SocialMediaPost => "social_media_post",
            Self::Screenshot => "screenshot",
            Self::ChatMessage => "chat_message",
            Self::Email => "email",
            Self::Document => "document",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::NetworkLog => "network_log",
            Self::DatabaseRecord => "database_record",
            Self::SystemLog => "system_log",
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The opaque external platform payload, byte-for-byte as collected.
///
/// Serializes as standard base64 so it embeds cleanly in the canonical
/// JSON form. The bytes are never interpreted by the engine; they exist to
/// be fingerprinted and re-exported.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RawPayload(Vec<u8>);

impl RawPayload {
    /// Wrap collected bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of payload bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for RawPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawPayload({} bytes)", self.0.len())
    }
}

impl Serialize for RawPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use base64::Engine as _;
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for RawPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use base64::Engine as _;
        let s = String::deserialize(deserializer)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// What was collected: a closed sum type over [`EvidenceType`].
///
/// The serde tag is `evidence_type` with the same snake_case names as the
/// enumeration, so a serialized payload is self-describing and the
/// canonical form of each variant is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "evidence_type", rename_all = "snake_case")]
pub enum SourcePayload {
    /// A social-media post.
    SocialMediaPost {
        /// Platform name, e.g. `Twitter`.
        platform: String,
        /// Platform-native post identifier.
        post_id: String,
        /// Author handle or account identifier.
        author: String,
        /// The platform response bytes.
        raw: RawPayload,
    },
    /// A screen capture.
    Screenshot {
        /// URL or window title that was captured, if known.
        capture_target: String,
        /// The image bytes.
        raw: RawPayload,
    },
    /// A chat message.
    ChatMessage {
        /// Platform name, e.g. `WhatsApp`.
        platform: String,
        /// Conversation or thread identifier.
        conversation_id: String,
        /// Sender handle.
        sender: String,
        /// The message export bytes.
        raw: RawPayload,
    },
    /// An email message.
    Email {
        /// RFC 5322 Message-ID.
        message_id: String,
        /// Sender address.
        from: String,
        /// The full message source (headers and body).
        raw: RawPayload,
    },
    /// A document file.
    Document {
        /// Document title or original filename.
        title: String,
        /// MIME type if known, else empty.
        media_type: String,
        /// The document bytes.
        raw: RawPayload,
    },
    /// An audio recording.
    Audio {
        /// Recording duration in whole seconds, 0 if unknown.
        duration_secs: u64,
        /// MIME type if known, else empty.
        media_type: String,
        /// The audio bytes.
        raw: RawPayload,
    },
    /// A video recording.
    Video {
        /// Recording duration in whole seconds, 0 if unknown.
        duration_secs: u64,
        /// MIME type if known, else empty.
        media_type: String,
        /// The video bytes.
        raw: RawPayload,
    },
    /// A network traffic log.
    NetworkLog {
        /// Host or sensor that produced the capture.
        source_host: String,
        /// The capture bytes.
        raw: RawPayload,
    },
    /// A database export.
    DatabaseRecord {
        /// Source database or table name.
        source_table: String,
        /// The exported rows.
        raw: RawPayload,
    },
    /// A system or application log slice.
    SystemLog {
        /// Host that produced the log.
        host: String,
        /// Producing application or unit name.
        unit: String,
        /// The log bytes.
        raw: RawPayload,
    },
}

impl SourcePayload {
    /// The evidence type this payload belongs to.
    pub fn evidence_type(&self) -> EvidenceType {
        match self {
            Self::SocialMediaPost { .. } => EvidenceType::SocialMediaPost,
            Self::Screenshot { .. } => EvidenceType::Screenshot,
            Self::ChatMessage { .. } => EvidenceType::ChatMessage,
            Self::Email { .. } => EvidenceType::Email,
            Self::Document { .. } => EvidenceType::Document,
            Self::Audio { .. } => EvidenceType::Audio,
            Self::Video { .. } => EvidenceType::Video,
            Self::NetworkLog { .. } => EvidenceType::NetworkLog,
            Self::DatabaseRecord { .. } => EvidenceType::DatabaseRecord,
            Self::SystemLog { .. } => EvidenceType::SystemLog,
        }
    }

    /// The opaque platform bytes, whichever variant holds them.
    pub fn raw(&self) -> &RawPayload {
        match self {
            Self::SocialMediaPost { raw, .. }
            | Self::Screenshot { raw, .. }
            | Self::ChatMessage { raw, .. }
            | Self::Email { raw, .. }
            | Self::Document { raw, .. }
            | Self::Audio { raw, .. }
            | Self::Video { raw, .. }
            | Self::NetworkLog { raw, .. }
            | Self::DatabaseRecord { raw, .. }
            | Self::SystemLog { raw, .. } => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalBytes;

    fn sample_post() -> SourcePayload {
        SourcePayload::SocialMediaPost {
            platform: "Twitter".to_string(),
            post_id: "123".to_string(),
            author: "suspect_account".to_string(),
            raw: RawPayload::new(br#"{"tweet_id":"123"}"#.to_vec()),
        }
    }

    #[test]
    fn evidence_type_round_trips_through_serde() {
        for et in [
            EvidenceType::SocialMediaPost,
            EvidenceType::Screenshot,
            EvidenceType::ChatMessage,
            EvidenceType::Email,
            EvidenceType::Document,
            EvidenceType::Audio,
            EvidenceType::Video,
            EvidenceType::NetworkLog,
            EvidenceType::DatabaseRecord,
            EvidenceType::SystemLog,
        ] {
            let json = serde_json::to_string(&et).unwrap();
            assert_eq!(json, format!("\"{}\"", et.as_str()));
            let back: EvidenceType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, et);
        }
    }

    #[test]
    fn payload_carries_its_evidence_type() {
        assert_eq!(sample_post().evidence_type(), EvidenceType::SocialMediaPost);
        let log = SourcePayload::SystemLog {
            host: "ws-14".to_string(),
            unit: "sshd".to_string(),
            raw: RawPayload::new(b"Accepted publickey for root".to_vec()),
        };
        assert_eq!(log.evidence_type(), EvidenceType::SystemLog);
    }

    #[test]
    fn payload_serde_roundtrip() {
        let payload = sample_post();
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"evidence_type\":\"social_media_post\""));
        let back: SourcePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn raw_payload_serializes_as_base64() {
        let raw = RawPayload::new(b"hello".to_vec());
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(json, "\"aGVsbG8=\"");
        let back: RawPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_bytes(), b"hello");
    }

    #[test]
    fn raw_payload_debug_hides_contents() {
        let raw = RawPayload::new(b"secret material".to_vec());
        assert_eq!(format!("{raw:?}"), "RawPayload(15 bytes)");
    }

    #[test]
    fn payload_canonicalizes_deterministically() {
        let a = CanonicalBytes::new(&sample_post()).unwrap();
        let b = CanonicalBytes::new(&sample_post()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn distinct_payloads_canonicalize_differently() {
        let mut other = sample_post();
        if let SourcePayload::SocialMediaPost { post_id, .. } = &mut other {
            *post_id = "124".to_string();
        }
        let a = CanonicalBytes::new(&sample_post()).unwrap();
        let b = CanonicalBytes::new(&other).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
