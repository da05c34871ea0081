//! Image-edit strategy
//!
//! Two stages: a vision pass derives a self-contained image prompt from
//! the attached image plus the user's edit instruction, then the image
//! strategy renders it. A failed or empty vision pass falls back to the
//! user's prompt verbatim - the edit is never silently aborted.

use crate::attachment::Attachment;
use crate::response::StructuredResponse;
use crate::strategy::image;
use nexus_llm::{GenerativeBackend, TextRequest};
use tracing::{debug, instrument, warn};

/// Run a two-stage image edit
#[instrument(skip(backend, prompt, attachment))]
pub async fn generate(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    attachment: &Attachment,
) -> StructuredResponse {
    let (mime_type, data) = attachment.inline_payload();
    let instruction = format!(
        "Describe this image in detail. Then, considering the user's request: \"{prompt}\", \
         create a full prompt for an image generator to recreate this image with the \
         requested changes."
    );
    let request = TextRequest::new()
        .push_inline(mime_type, data)
        .push_text(instruction);

    let derived_prompt = match backend.generate_content(request).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            debug!("vision stage returned no usable text, keeping the original prompt");
            prompt.to_string()
        }
        Err(e) => {
            warn!(error = %e, "vision stage failed, keeping the original prompt");
            prompt.to_string()
        }
    };

    image::generate(backend, &derived_prompt, false).await
}
