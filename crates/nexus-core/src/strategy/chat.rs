//! Conversational strategy - the default for most modes
//!
//! Frames the request with the mode's role instruction and the serialized
//! response schema, then parses the model's (possibly fence-wrapped) JSON
//! output. Text that fails structured parsing degrades to a raw-narrative
//! envelope; an absent response or transport failure becomes an error
//! envelope.

use crate::attachment::Attachment;
use crate::envelope::error_envelope;
use crate::mode::Mode;
use crate::response::{self, StructuredResponse};
use nexus_llm::{GenerativeBackend, TextRequest};
use tracing::instrument;

/// Fixed sampling temperature for conversational generation
const TEMPERATURE: f32 = 0.7;

/// System instruction: role framing, active mode, schema, and mode rules
pub(crate) fn build_system_instruction(mode: Mode) -> String {
    let schema =
        serde_json::to_string_pretty(&response::schema_definition()).unwrap_or_default();
    format!(
        "{role}\nCurrent Mode: {label}.\n\n\
         OUTPUT: a single JSON object matching this schema:\n{schema}\n\n\
         RULES:\n\
         - If SECURITY mode: focus on risk assessment, permissions, and vulnerabilities.\n\
         - If CONVERTER mode: provide 'code' widgets with conversion scripts.\n\
         - If ARCHITECT/MAGIC mode: provide a 'prototype' widget for UI.\n",
        role = mode.role_instruction(),
        label = mode.label(),
    )
}

/// Run one conversational exchange
#[instrument(skip(backend, prompt, attachment), fields(mode = %mode))]
pub async fn generate(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    mode: Mode,
    attachment: Option<&Attachment>,
) -> StructuredResponse {
    let mut request = TextRequest::new()
        .with_system_instruction(build_system_instruction(mode))
        .with_temperature(TEMPERATURE)
        .with_search(true);

    if let Some(attachment) = attachment {
        let (mime_type, data) = attachment.inline_payload();
        request = request.push_inline(mime_type, data);
    }
    request = request.push_text(prompt);

    match backend.generate_content(request).await {
        Ok(text) => response::parse_model_text(&text),
        Err(e) => error_envelope(e, "conversation"),
    }
}
