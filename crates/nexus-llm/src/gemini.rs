//! generateContent wire types
//!
//! Serves both structured/text generation and speech synthesis (the latter
//! via the AUDIO response modality).

use crate::backend::{ContentPart, SpeechRequest, TextRequest};
use crate::client::GeminiClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Blob {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

// ============================================================================
// Conversion
// ============================================================================

fn convert_parts(parts: Vec<ContentPart>) -> Vec<Part> {
    parts
        .into_iter()
        .map(|part| match part {
            ContentPart::Text(text) => Part::Text { text },
            ContentPart::InlineData { mime_type, data } => Part::InlineData {
                inline_data: Blob { mime_type, data },
            },
        })
        .collect()
}

fn build_request(request: TextRequest) -> GenerateContentRequest {
    let system_instruction = request.system_instruction.map(|text| Content {
        role: None,
        parts: vec![Part::Text { text }],
    });

    let tools = request.enable_search.then(|| {
        vec![Tool {
            google_search: serde_json::json!({}),
        }]
    });

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: convert_parts(request.parts),
        }],
        system_instruction,
        generation_config: Some(GenerationConfig {
            temperature: request.temperature,
            response_modalities: None,
            speech_config: None,
        }),
        tools,
    }
}

impl GenerateContentResponse {
    /// Surface a safety block as a typed error
    fn check_blocked(&self) -> Result<()> {
        if let Some(feedback) = &self.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(Error::Blocked(reason.clone()));
            }
        }
        if let Some(candidate) = self.candidates.first() {
            if candidate.finish_reason.as_deref() == Some("SAFETY") {
                return Err(Error::Blocked("candidate finished with SAFETY".to_string()));
            }
        }
        Ok(())
    }

    /// Concatenated text of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text.as_str()),
                        Part::InlineData { .. } => None,
                    })
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// First inline payload of the first candidate (audio for TTS)
    fn inline_data(&self) -> Option<&Blob> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| {
                content.parts.iter().find_map(|part| match part {
                    Part::InlineData { inline_data } => Some(inline_data),
                    Part::Text { .. } => None,
                })
            })
    }
}

// ============================================================================
// Client Methods
// ============================================================================

impl GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.config.text_model))]
    pub(crate) async fn generate_content_inner(&self, request: TextRequest) -> Result<String> {
        let url = self.model_url(&self.config.text_model, "generateContent");
        let wire = build_request(request);

        let body = self.post_json(&url, &wire).await?;
        let response: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        response.check_blocked()?;

        let text = response.text();
        if text.is_empty() {
            warn!("no response text received from the model");
            return Err(Error::InvalidResponse(
                "no response text received from the model".to_string(),
            ));
        }
        debug!(chars = text.len(), "content generated");
        Ok(text)
    }

    #[instrument(skip(self, request), fields(model = %self.config.speech_model))]
    pub(crate) async fn generate_speech_inner(&self, request: SpeechRequest) -> Result<String> {
        let url = self.model_url(&self.config.speech_model, "generateContent");
        let wire = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::Text { text: request.text }],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                temperature: None,
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: request.voice,
                        },
                    },
                }),
            }),
            tools: None,
        };

        let body = self.post_json(&url, &wire).await?;
        let response: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        response.check_blocked()?;

        match response.inline_data() {
            Some(blob) => Ok(blob.data.clone()),
            None => Err(Error::InvalidResponse(
                "no audio payload in speech response".to_string(),
            )),
        }
    }
}
