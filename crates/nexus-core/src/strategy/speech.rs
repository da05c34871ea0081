//! Speech synthesis strategy
//!
//! Narrates text with the fixed voice identity. Failure means "speech
//! unavailable" - logged and mapped to `None`, never escalated, since no
//! envelope wraps the result.

use nexus_llm::{GenerativeBackend, SpeechRequest};
use tracing::{instrument, warn};

/// Synthesize speech for narrative text, as a playable audio data URI
#[instrument(skip(backend, text))]
pub async fn synthesize(backend: &dyn GenerativeBackend, text: &str) -> Option<String> {
    match backend.generate_speech(SpeechRequest::new(text)).await {
        Ok(data) => Some(format!("data:audio/wav;base64,{data}")),
        Err(e) => {
            warn!(error = %e, "speech synthesis unavailable");
            None
        }
    }
}
