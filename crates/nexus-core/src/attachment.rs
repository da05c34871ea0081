//! Attachment encoder
//!
//! Normalizes user-captured media (file uploads, recorded audio) into a
//! transport-ready payload: base64 text plus a kind tag and MIME type.
//! Capture components may hand over raw bytes or a full data URI; both
//! converge on the same shape here.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of user-supplied media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Still image
    Image,
    /// Audio clip (e.g. a finished microphone recording)
    Audio,
    /// Video clip
    Video,
}

impl AttachmentKind {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// MIME type assumed when the capture source did not report one
    #[must_use]
    pub fn fallback_mime_type(&self) -> &'static str {
        match self {
            Self::Image => "image/jpeg",
            Self::Audio => "audio/wav",
            Self::Video => "video/mp4",
        }
    }

    /// Classify a MIME type into an attachment kind
    #[must_use]
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type.starts_with("video/") {
            Self::Video
        } else if mime_type.starts_with("audio/") {
            Self::Audio
        } else {
            Self::Image
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied media accompanying a prompt
///
/// Owned by the message or pending-send buffer holding it; consumed by at
/// most one send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Media kind
    pub kind: AttachmentKind,
    /// Base64-encoded payload (no data-URI prefix)
    pub data: String,
    /// Reported MIME type, if the capture source knew it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Attachment {
    /// Encode raw bytes into an attachment
    #[must_use]
    pub fn from_bytes(kind: AttachmentKind, bytes: &[u8], mime_type: Option<String>) -> Self {
        Self {
            kind,
            data: BASE64.encode(bytes),
            mime_type,
        }
    }

    /// Wrap an already base64-encoded payload.
    ///
    /// A data-URI prefix (`data:<mime>;base64,`) is tolerated and stripped.
    #[must_use]
    pub fn from_base64(
        kind: AttachmentKind,
        data: impl Into<String>,
        mime_type: Option<String>,
    ) -> Self {
        let data = data.into();
        let data = match data.split_once(',') {
            Some((_, payload)) => payload.to_string(),
            None => data,
        };
        Self {
            kind,
            data,
            mime_type,
        }
    }

    /// Parse a full data URI, taking kind and MIME type from its header
    #[must_use]
    pub fn from_data_uri(uri: &str) -> Self {
        let mime_type = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let kind = mime_type
            .as_deref()
            .map(AttachmentKind::from_mime_type)
            .unwrap_or(AttachmentKind::Image);
        Self::from_base64(kind, uri, mime_type)
    }

    /// MIME type to transmit, falling back per kind
    #[must_use]
    pub fn effective_mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or_else(|| self.kind.fallback_mime_type())
    }

    /// Transport-ready (MIME type, clean base64) pair
    #[must_use]
    pub fn inline_payload(&self) -> (&str, &str) {
        (self.effective_mime_type(), &self.data)
    }
}
