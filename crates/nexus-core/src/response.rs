//! Response schema
//!
//! The canonical structured-response envelope every generation strategy
//! must satisfy, plus the parsing policy for model output: strip markdown
//! code fences, parse, and normalize polymorphic widget content in one
//! pass. Text that is present but unparsable degrades to a raw-narrative
//! envelope; that path is deliberately distinct from the error envelope
//! (no structured data vs. no data at all).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Domain label for the degraded (unparsable-but-present) envelope
pub const DEGRADED_DOMAIN: &str = "General Response";

// ============================================================================
// Widgets
// ============================================================================

/// Kind of a renderable widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Code snippet
    Code,
    /// Ordered step list
    Steps,
    /// Impact statement
    Impact,
    /// Chart placeholder
    Chart,
    /// Plain summary text
    Summary,
    /// Renderable markup (sandboxed)
    Prototype,
    /// Security assessment text
    SecurityReport,
    /// Anything this version does not recognize; skipped at render time
    #[serde(other)]
    Unknown,
}

/// One entry of a step list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Step title
    pub title: String,
    /// Optional detail text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Normalized widget content
///
/// The wire allows the same widget kind to carry either structured data or
/// a JSON-encoded string of it; normalization happens once, at
/// deserialization, so render time never re-interprets payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetContent {
    /// No content
    Empty,
    /// Free text
    Text(String),
    /// Ordered steps
    Steps(Vec<Step>),
    /// Raw markup; must only ever be rendered in a sandboxed context
    Markup(String),
}

/// One typed, renderable unit of a response
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    /// Widget kind
    pub kind: WidgetKind,
    /// Display title
    pub title: String,
    /// Normalized content
    pub content: WidgetContent,
}

impl Widget {
    /// Create a free-text widget
    #[must_use]
    pub fn text(kind: WidgetKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: WidgetContent::Text(content.into()),
        }
    }

    /// Create a step-list widget
    #[must_use]
    pub fn steps(title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            kind: WidgetKind::Steps,
            title: title.into(),
            content: WidgetContent::Steps(steps),
        }
    }

    fn from_raw(kind: WidgetKind, title: String, content: Value) -> Self {
        let content = match kind {
            WidgetKind::Steps => WidgetContent::Steps(parse_steps(&content)),
            WidgetKind::Prototype => WidgetContent::Markup(value_to_text(&content)),
            _ if content.is_null() => WidgetContent::Empty,
            _ => WidgetContent::Text(value_to_text(&content)),
        };
        Self {
            kind,
            title,
            content,
        }
    }
}

#[derive(Deserialize)]
struct RawWidget {
    #[serde(rename = "type", default = "unknown_kind")]
    kind: WidgetKind,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: Value,
}

fn unknown_kind() -> WidgetKind {
    WidgetKind::Unknown
}

impl<'de> Deserialize<'de> for Widget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawWidget::deserialize(deserializer)?;
        Ok(Widget::from_raw(raw.kind, raw.title, raw.content))
    }
}

impl Serialize for Widget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let content = match &self.content {
            WidgetContent::Empty => Value::Null,
            WidgetContent::Text(text) | WidgetContent::Markup(text) => {
                Value::String(text.clone())
            }
            WidgetContent::Steps(steps) => {
                serde_json::to_value(steps).map_err(serde::ser::Error::custom)?
            }
        };
        let mut state = serializer.serialize_struct("Widget", 3)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("content", &content)?;
        state.end()
    }
}

/// Parse step-list content from either an actual sequence or a
/// JSON-encoded string of one. Parse failure yields an empty list.
#[must_use]
pub fn parse_steps(value: &Value) -> Vec<Step> {
    match value {
        Value::Array(items) => items.iter().filter_map(step_from_value).collect(),
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => items.iter().filter_map(step_from_value).collect(),
            _ => {
                debug!("step content not parseable as a list, rendering empty");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

fn step_from_value(value: &Value) -> Option<Step> {
    match value {
        Value::String(title) => Some(Step {
            title: title.clone(),
            description: None,
        }),
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Kind of generated media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Generated image
    Image,
    /// Generated video
    Video,
}

/// Media produced by a synthesis strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMedia {
    /// Media kind
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Location of the media (data URI or authorized remote URL)
    pub url: String,
    /// MIME type
    pub mime_type: String,
}

/// The canonical structured response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResponse {
    /// Human-facing prose
    #[serde(default)]
    pub narrative: String,
    /// Animation trigger tokens, opaque to the core
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visual_cues: Vec<String>,
    /// Classification label for display
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Impact score, clamped to 0-100 during deserialization
    #[serde(
        default = "default_impact_score",
        deserialize_with = "deserialize_impact_score"
    )]
    pub impact_score: u8,
    /// Deeper analysis text
    #[serde(default)]
    pub analysis: String,
    /// Renderable widgets, in order
    #[serde(default)]
    pub widgets: Vec<Widget>,
    /// Suggested follow-up actions
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    /// Offered export formats
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub export_options: Vec<String>,
    /// Media produced by a synthesis strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_media: Option<GeneratedMedia>,
    /// Marks a failure envelope; narrative/analysis carry diagnostics
    #[serde(default, skip_serializing_if = "is_false")]
    pub error: bool,
}

fn default_domain() -> String {
    DEGRADED_DOMAIN.to_string()
}

fn default_impact_score() -> u8 {
    50
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn deserialize_impact_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let score = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match score {
        Some(score) => Ok(score.clamp(0.0, 100.0).round() as u8),
        None => Err(D::Error::custom("impactScore must be numeric")),
    }
}

impl StructuredResponse {
    /// Best-effort envelope wrapping raw text that failed structured
    /// parsing. Not an error envelope: the model did answer.
    #[must_use]
    pub fn degraded(raw_text: &str) -> Self {
        Self {
            narrative: raw_text.to_string(),
            visual_cues: Vec::new(),
            domain: DEGRADED_DOMAIN.to_string(),
            impact_score: 50,
            analysis: "Structured data parsing failed, displaying raw output.".to_string(),
            widgets: Vec::new(),
            suggested_actions: Vec::new(),
            export_options: Vec::new(),
            generated_media: None,
            error: false,
        }
    }
}

// ============================================================================
// Model Output Parsing
// ============================================================================

/// Strip leading/trailing markdown code-fence markers.
///
/// Fence-wrapped JSON must parse identically to bare JSON.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) up to the first newline
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    let rest = rest.trim();
    match rest.strip_suffix("```") {
        Some(body) => body.trim(),
        None => rest,
    }
}

/// Parse model output text into a structured response.
///
/// On parse failure the raw text is preserved as a degraded envelope
/// rather than failing the exchange.
#[must_use]
pub fn parse_model_text(text: &str) -> StructuredResponse {
    let cleaned = strip_code_fences(text);
    match serde_json::from_str::<StructuredResponse>(cleaned) {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "structured parse failed, degrading to raw narrative");
            StructuredResponse::degraded(text)
        }
    }
}

/// Schema description serialized into the conversational system
/// instruction so the model knows the envelope shape.
#[must_use]
pub fn schema_definition() -> Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "narrative": { "type": "STRING", "description": "Cinematic, emotional, high-tech storytelling narration." },
            "visualCues": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Animation triggers: '(glow-in)', '(slide-left)', '(particles-fast)', '(rotate-3d)'."
            },
            "domain": { "type": "STRING", "description": "Detected domain." },
            "impactScore": { "type": "INTEGER", "description": "Impact score 0-100." },
            "analysis": { "type": "STRING", "description": "Deep insightful analysis utilizing researched data." },
            "widgets": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "enum": ["code", "steps", "impact", "chart", "summary", "prototype", "security_report"] },
                        "title": { "type": "STRING" },
                        "content": { "type": "STRING", "description": "For 'prototype', valid HTML. For 'steps', a JSON array." }
                    }
                },
                "description": "UI components."
            },
            "suggestedActions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "exportOptions": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["narrative", "domain", "impactScore", "analysis", "widgets", "suggestedActions"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "narrative": "Done.",
        "domain": "Code Analysis",
        "impactScore": 72,
        "analysis": "It works.",
        "widgets": [{"type": "code", "title": "Snippet", "content": "fn main() {}"}],
        "suggestedActions": ["Run it"]
    }"#;

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let fenced = format!("```json\n{VALID}\n```");
        let plain_fence = format!("```\n{VALID}\n```");
        let bare = parse_model_text(VALID);
        assert_eq!(parse_model_text(&fenced), bare);
        assert_eq!(parse_model_text(&plain_fence), bare);
        assert_eq!(bare.domain, "Code Analysis");
        assert_eq!(bare.impact_score, 72);
        assert!(!bare.error);
    }

    #[test]
    fn test_unparsable_text_degrades() {
        let response = parse_model_text("I could not produce JSON, sorry.");
        assert_eq!(response.narrative, "I could not produce JSON, sorry.");
        assert_eq!(response.domain, DEGRADED_DOMAIN);
        assert_eq!(response.impact_score, 50);
        assert!(response.widgets.is_empty());
        assert!(!response.error);
    }

    #[test]
    fn test_steps_as_encoded_string() {
        let json = r#"{
            "narrative": "n", "domain": "d", "impactScore": 10, "analysis": "a",
            "widgets": [{"type": "steps", "title": "Plan", "content": "[{\"title\":\"Step A\"}]"}],
            "suggestedActions": []
        }"#;
        let response = parse_model_text(json);
        assert_eq!(response.widgets.len(), 1);
        match &response.widgets[0].content {
            WidgetContent::Steps(steps) => {
                assert_eq!(steps.len(), 1);
                assert_eq!(steps[0].title, "Step A");
            }
            other => panic!("expected steps, got {other:?}"),
        }
    }

    #[test]
    fn test_steps_as_list_of_strings() {
        let value = serde_json::json!(["First", "Second"]);
        let steps = parse_steps(&value);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].title, "Second");
        assert!(steps[1].description.is_none());
    }

    #[test]
    fn test_malformed_steps_render_empty() {
        let value = Value::String("not a list at all".to_string());
        assert!(parse_steps(&value).is_empty());
        let value = serde_json::json!({"title": "lonely object"});
        assert!(parse_steps(&value).is_empty());
    }

    #[test]
    fn test_unknown_widget_kind_is_tolerated() {
        let json = r#"{
            "narrative": "n", "domain": "d", "impactScore": 10, "analysis": "a",
            "widgets": [{"type": "hologram", "title": "Future", "content": "shiny"}],
            "suggestedActions": []
        }"#;
        let response = parse_model_text(json);
        assert_eq!(response.widgets[0].kind, WidgetKind::Unknown);
        assert_eq!(response.domain, "d");
    }

    #[test]
    fn test_impact_score_is_clamped() {
        let overflow = r#"{"narrative":"n","domain":"d","impactScore":250,"analysis":"a","widgets":[],"suggestedActions":[]}"#;
        assert_eq!(parse_model_text(overflow).impact_score, 100);
        let negative = r#"{"narrative":"n","domain":"d","impactScore":-5,"analysis":"a","widgets":[],"suggestedActions":[]}"#;
        assert_eq!(parse_model_text(negative).impact_score, 0);
        let stringy = r#"{"narrative":"n","domain":"d","impactScore":"72","analysis":"a","widgets":[],"suggestedActions":[]}"#;
        assert_eq!(parse_model_text(stringy).impact_score, 72);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let minimal = r#"{"narrative":"n","domain":"d","impactScore":1,"analysis":"a","widgets":[],"suggestedActions":[]}"#;
        let response = parse_model_text(minimal);
        assert!(response.visual_cues.is_empty());
        assert!(response.export_options.is_empty());
        assert!(response.generated_media.is_none());
        assert!(!response.error);
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let response = StructuredResponse {
            narrative: "n".to_string(),
            visual_cues: vec!["(flash)".to_string()],
            domain: "d".to_string(),
            impact_score: 88,
            analysis: "a".to_string(),
            widgets: vec![Widget::steps(
                "Plan",
                vec![Step {
                    title: "Step A".to_string(),
                    description: Some("details".to_string()),
                }],
            )],
            suggested_actions: vec!["Retry".to_string()],
            export_options: vec!["JPEG".to_string()],
            generated_media: Some(GeneratedMedia {
                kind: MediaKind::Image,
                url: "data:image/jpeg;base64,QUJD".to_string(),
                mime_type: "image/jpeg".to_string(),
            }),
            error: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["impactScore"], 88);
        assert_eq!(json["suggestedActions"][0], "Retry");
        assert_eq!(json["generatedMedia"]["type"], "image");
        assert_eq!(json["generatedMedia"]["mimeType"], "image/jpeg");
        assert_eq!(json["widgets"][0]["type"], "steps");
        assert_eq!(json["widgets"][0]["content"][0]["title"], "Step A");
        assert!(json.get("error").is_none());

        // And the wire form parses back to the same envelope
        let back: StructuredResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_fence_stripping_edge_cases() {
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}"), "{\"a\":1}");
    }
}
