//! Gemini client - configuration and HTTP plumbing
//!
//! One `reqwest::Client` shared by all four generation surfaces. Model
//! identities and the credential are configured here; wire types live in
//! `gemini`, `imagen` and `veo`.

use crate::backend::{
    GeneratedImage, GenerativeBackend, ImageRequest, SpeechRequest, TextRequest, VideoOperation,
    VideoRequest,
};
use crate::error::{Error, Result};
use crate::util::{mask_api_key, truncate_safe};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for text/structured generation
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for image synthesis
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-001";

/// Default model for video synthesis
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

/// Default model for speech synthesis
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Gemini client configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Model for text/structured generation
    pub text_model: String,
    /// Model for image synthesis
    pub image_model: String,
    /// Model for video synthesis
    pub video_model: String,
    /// Model for speech synthesis
    pub speech_model: String,
    /// Request timeout
    pub timeout: Duration,
}

// Custom Debug implementation to mask the credential
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("video_model", &self.video_model)
            .field("speech_model", &self.speech_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `GEMINI_API_KEY` or `GOOGLE_API_KEY` for the credential and
    /// `GEMINI_BASE_URL` / `GEMINI_MODEL` for optional overrides.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                Error::NotConfigured("GEMINI_API_KEY or GOOGLE_API_KEY not set".to_string())
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.text_model = model;
        }
        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the text model
    #[must_use]
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Set the image model
    #[must_use]
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Set the video model
    #[must_use]
    pub fn with_video_model(mut self, model: impl Into<String>) -> Self {
        self.video_model = model.into();
        self
    }

    /// Set the speech model
    #[must_use]
    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Gemini backend client
pub struct GeminiClient {
    pub(crate) client: Client,
    pub(crate) config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Model endpoint URL with the key appended as a query parameter
    pub(crate) fn model_url(&self, model: &str, action: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.base_url, model, action, self.config.api_key
        )
    }

    /// Operation resource URL (for long-running job polling)
    pub(crate) fn operation_url(&self, name: &str) -> String {
        format!("{}/{}?key={}", self.config.base_url, name, self.config.api_key)
    }

    /// Map a reqwest transport error onto the error taxonomy
    pub(crate) fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout.as_millis() as u64)
        } else {
            Error::Network(err.to_string())
        }
    }

    /// Map a non-success HTTP response onto the error taxonomy
    pub(crate) fn status_error(&self, status: StatusCode, body: &str) -> Error {
        if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
            warn!(
                error_status = %parsed.error.status,
                error_code = parsed.error.code,
                "backend api error"
            );
            if status.as_u16() == 429 {
                return Error::RateLimit;
            }
            let lower = parsed.error.message.to_lowercase();
            if lower.contains("safety") || lower.contains("blocked") {
                return Error::Blocked(parsed.error.message);
            }
            return Error::Api(format!(
                "{}: {}",
                parsed.error.status,
                truncate_safe(&parsed.error.message, 300)
            ));
        }
        if status.as_u16() == 429 {
            return Error::RateLimit;
        }
        Error::Api(format!("HTTP {}: {}", status, truncate_safe(body, 300)))
    }

    /// POST a JSON request and return the raw response body text
    pub(crate) async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        request: &T,
    ) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            debug!(%status, "backend request failed");
            return Err(self.status_error(status, &body));
        }
        Ok(body)
    }

    /// GET a resource and return the raw response body text
    pub(crate) async fn get_json(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            debug!(%status, "backend poll failed");
            return Err(self.status_error(status, &body));
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_content(&self, request: TextRequest) -> Result<String> {
        self.generate_content_inner(request).await
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage> {
        self.generate_image_inner(request).await
    }

    async fn start_video(&self, request: VideoRequest) -> Result<VideoOperation> {
        self.start_video_inner(request).await
    }

    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation> {
        self.poll_video_inner(operation).await
    }

    async fn generate_speech(&self, request: SpeechRequest) -> Result<String> {
        self.generate_speech_inner(request).await
    }

    fn authorize_media_url(&self, url: &str) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}key={}", url, separator, self.config.api_key)
    }
}
