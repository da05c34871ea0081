//! Backend contract - the seam between strategies and the wire client
//!
//! This module defines the `GenerativeBackend` trait and the request types
//! shared by all generation strategies. The orchestration core depends only
//! on this trait, so tests can script a backend without touching the network.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default voice identity for speech synthesis
pub const DEFAULT_VOICE: &str = "Kore";

/// Default aspect ratio for generated media
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Default output MIME type for generated images
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Default resolution for generated video
pub const DEFAULT_VIDEO_RESOLUTION: &str = "720p";

// ============================================================================
// Request Types
// ============================================================================

/// One part of a multimodal content request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Plain text
    Text(String),
    /// Inline binary payload, base64-encoded
    InlineData {
        /// MIME type of the payload
        mime_type: String,
        /// Base64-encoded bytes
        data: String,
    },
}

/// Request for text/structured content generation
#[derive(Debug, Clone, Default)]
pub struct TextRequest {
    /// System instruction text
    pub system_instruction: Option<String>,
    /// Ordered content parts (text and/or inline binary)
    pub parts: Vec<ContentPart>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Grant the backend its search tool
    pub enable_search: bool,
}

impl TextRequest {
    /// Create an empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the system instruction
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Grant or revoke the search tool
    #[must_use]
    pub fn with_search(mut self, enable: bool) -> Self {
        self.enable_search = enable;
        self
    }

    /// Append a text part
    #[must_use]
    pub fn push_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(ContentPart::Text(text.into()));
        self
    }

    /// Append an inline binary part
    #[must_use]
    pub fn push_inline(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.parts.push(ContentPart::InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        });
        self
    }
}

/// Request for image synthesis
#[derive(Debug, Clone)]
pub struct ImageRequest {
    /// Prompt text
    pub prompt: String,
    /// Number of images to generate
    pub sample_count: u32,
    /// Aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,
    /// Output MIME type
    pub output_mime_type: String,
}

impl ImageRequest {
    /// Create a request with the fixed defaults (one image, 16:9, jpeg)
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            sample_count: 1,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            output_mime_type: DEFAULT_IMAGE_MIME.to_string(),
        }
    }
}

/// A generated image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type of the bytes
    pub mime_type: String,
}

/// Request for video synthesis
#[derive(Debug, Clone)]
pub struct VideoRequest {
    /// Prompt text
    pub prompt: String,
    /// Number of videos to generate
    pub sample_count: u32,
    /// Output resolution, e.g. "720p"
    pub resolution: String,
    /// Aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,
}

impl VideoRequest {
    /// Create a request with the fixed defaults (one video, 720p, 16:9)
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            sample_count: 1,
            resolution: DEFAULT_VIDEO_RESOLUTION.to_string(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }
}

/// Handle to a long-running video synthesis job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoOperation {
    /// Backend job identifier
    pub name: String,
    /// Whether the job has reached a terminal state
    pub done: bool,
    /// Result URI, present once the job is done
    pub result_uri: Option<String>,
}

impl VideoOperation {
    /// Create a handle for a freshly submitted job
    #[must_use]
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            result_uri: None,
        }
    }
}

/// Request for speech synthesis
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Text to speak
    pub text: String,
    /// Voice identity
    pub voice: String,
}

impl SpeechRequest {
    /// Create a request with the fixed default voice
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

// ============================================================================
// Backend Trait
// ============================================================================

/// The generative backend contract
///
/// One implementation talks to the real service; tests substitute scripted
/// implementations. Every method is a single request/response exchange;
/// retry and polling policy live with the caller.
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate free-form text (possibly structured JSON) from a
    /// multimodal request. An empty candidate set is an error, never an
    /// empty string.
    async fn generate_content(&self, request: TextRequest) -> Result<String>;

    /// Generate a single image. Missing image bytes in a nominally
    /// successful response is an error.
    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage>;

    /// Submit a video synthesis job and return its handle
    async fn start_video(&self, request: VideoRequest) -> Result<VideoOperation>;

    /// Query a video job's status once
    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation>;

    /// Synthesize speech audio, returned as base64-encoded bytes
    async fn generate_speech(&self, request: SpeechRequest) -> Result<String>;

    /// Append the access credential the backend requires for fetching
    /// generated media. Identity for backends with public result URIs.
    fn authorize_media_url(&self, url: &str) -> String {
        url.to_string()
    }
}
