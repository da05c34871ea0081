use super::mock::ScriptedBackend;
use super::{chat, edit, image, speech, video, PollBudget};
use crate::mode::Mode;
use crate::attachment::{Attachment, AttachmentKind};
use crate::response::{MediaKind, WidgetKind};
use nexus_llm::{ContentPart, Error, GeneratedImage, VideoOperation};
use std::time::Duration;

const VALID_JSON: &str = r#"{
    "narrative": "All systems nominal.",
    "domain": "Code Analysis",
    "impactScore": 64,
    "analysis": "Looks fine.",
    "widgets": [{"type": "summary", "title": "Overview", "content": "ok"}],
    "suggestedActions": ["Ship it"]
}"#;

fn image_attachment() -> Attachment {
    Attachment::from_base64(AttachmentKind::Image, "QUJD", Some("image/png".to_string()))
}

fn sample_image() -> GeneratedImage {
    GeneratedImage {
        data: "QUJD".to_string(),
        mime_type: "image/jpeg".to_string(),
    }
}

// ============================================================================
// Conversational
// ============================================================================

#[tokio::test]
async fn chat_parses_fenced_json() {
    let backend = ScriptedBackend::new();
    backend.script_content(Ok(format!("```json\n{VALID_JSON}\n```")));

    let response = chat::generate(&backend, "analyze", Mode::Universal, None).await;
    assert!(!response.error);
    assert_eq!(response.domain, "Code Analysis");
    assert_eq!(response.impact_score, 64);
    assert_eq!(response.widgets[0].kind, WidgetKind::Summary);
}

#[tokio::test]
async fn chat_request_carries_schema_and_temperature() {
    let backend = ScriptedBackend::new();
    backend.script_content(Ok(VALID_JSON.to_string()));

    chat::generate(&backend, "hello", Mode::Security, Some(&image_attachment())).await;

    let requests = backend.content_requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.temperature, Some(0.7));
    assert!(request.enable_search);
    let system = request.system_instruction.as_deref().unwrap();
    assert!(system.contains("CYBERSECURITY"));
    assert!(system.contains("Security Guard"));
    assert!(system.contains("impactScore"));
    // Attachment part precedes the prompt text
    assert!(matches!(
        request.parts[0],
        ContentPart::InlineData { ref mime_type, .. } if mime_type == "image/png"
    ));
    assert_eq!(request.parts[1], ContentPart::Text("hello".to_string()));
}

#[tokio::test]
async fn chat_degrades_on_unparsable_text() {
    let backend = ScriptedBackend::new();
    backend.script_content(Ok("just prose, no JSON".to_string()));

    let response = chat::generate(&backend, "hi", Mode::Universal, None).await;
    assert!(!response.error);
    assert_eq!(response.narrative, "just prose, no JSON");
    assert_eq!(response.domain, "General Response");
}

#[tokio::test]
async fn chat_backend_failure_becomes_error_envelope() {
    let backend = ScriptedBackend::new();
    backend.script_content(Err(Error::RateLimit));

    let response = chat::generate(&backend, "hi", Mode::Universal, None).await;
    assert!(response.error);
    assert_eq!(response.domain, "Resource Limit");
    assert!(!response.narrative.is_empty());
    assert!(!response.suggested_actions.is_empty());
}

// ============================================================================
// Image
// ============================================================================

#[tokio::test]
async fn image_success_wraps_data_uri() {
    let backend = ScriptedBackend::new();
    backend.script_image(Ok(sample_image()));

    let response = image::generate(&backend, "red sports car", false).await;
    assert!(!response.error);
    assert_eq!(response.domain, "Creative Studio");
    let media = response.generated_media.unwrap();
    assert_eq!(media.kind, MediaKind::Image);
    assert_eq!(media.url, "data:image/jpeg;base64,QUJD");

    let requests = backend.image_requests.lock().unwrap();
    assert_eq!(requests[0].prompt, "red sports car");
    assert_eq!(requests[0].sample_count, 1);
}

#[tokio::test]
async fn image_volumetric_rewrites_prompt() {
    let backend = ScriptedBackend::new();
    backend.script_image(Ok(sample_image()));

    let response = image::generate(&backend, "a castle", true).await;
    assert_eq!(response.domain, "3D Modeling");

    let requests = backend.image_requests.lock().unwrap();
    assert!(requests[0].prompt.starts_with("3D render"));
    assert!(requests[0].prompt.ends_with("a castle"));
}

#[tokio::test]
async fn image_failure_becomes_error_envelope() {
    let backend = ScriptedBackend::new();
    backend.script_image(Err(Error::InvalidResponse(
        "image generation returned no image bytes".to_string(),
    )));

    let response = image::generate(&backend, "x", false).await;
    assert!(response.error);
    assert!(response.generated_media.is_none());
}

// ============================================================================
// Video
// ============================================================================

#[tokio::test(start_paused = true)]
async fn video_polls_until_done_and_authorizes_uri() {
    let backend = ScriptedBackend::new();
    backend.script_start(Ok(VideoOperation::pending("op1")));
    backend.script_poll(Ok(VideoOperation::pending("op1")));
    backend.script_poll(Ok(VideoOperation {
        name: "op1".to_string(),
        done: true,
        result_uri: Some("https://storage.example/clip.mp4?alt=media".to_string()),
    }));

    let response = video::generate(&backend, "a drone shot", PollBudget::default()).await;

    assert_eq!(backend.polls(), 2);
    assert!(!response.error);
    assert_eq!(response.domain, "Video Production");
    let media = response.generated_media.unwrap();
    assert_eq!(media.kind, MediaKind::Video);
    assert_eq!(
        media.url,
        "https://storage.example/clip.mp4?alt=media&key=test-key"
    );
}

#[tokio::test(start_paused = true)]
async fn video_budget_exhaustion_is_timeout() {
    let backend = ScriptedBackend::new();
    backend.script_start(Ok(VideoOperation::pending("op1")));
    backend.script_poll(Ok(VideoOperation::pending("op1")));
    backend.script_poll(Ok(VideoOperation::pending("op1")));

    let budget = PollBudget {
        interval: Duration::from_secs(5),
        max_wait: Duration::from_secs(7),
        ..PollBudget::default()
    };
    let response = video::generate(&backend, "slow job", budget).await;

    assert!(response.error);
    assert_eq!(response.domain, "Timeout");
    assert_eq!(backend.polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn video_cancellation_is_timeout() {
    let backend = ScriptedBackend::new();
    backend.script_start(Ok(VideoOperation::pending("op1")));

    let budget = PollBudget::default();
    budget.cancel.cancel();
    let response = video::generate(&backend, "cancelled job", budget).await;

    assert!(response.error);
    assert_eq!(response.domain, "Timeout");
    assert_eq!(backend.polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn video_done_without_uri_is_failure() {
    let backend = ScriptedBackend::new();
    backend.script_start(Ok(VideoOperation {
        name: "op1".to_string(),
        done: true,
        result_uri: None,
    }));

    let response = video::generate(&backend, "ghost job", PollBudget::default()).await;
    assert!(response.error);
    assert!(response.generated_media.is_none());
}

// ============================================================================
// Image Edit
// ============================================================================

#[tokio::test]
async fn edit_uses_derived_prompt() {
    let backend = ScriptedBackend::new();
    backend.script_content(Ok("a castle at night, painted sky".to_string()));
    backend.script_image(Ok(sample_image()));

    let response = edit::generate(&backend, "make it night", &image_attachment()).await;
    assert!(!response.error);

    let requests = backend.image_requests.lock().unwrap();
    assert_eq!(requests[0].prompt, "a castle at night, painted sky");
}

#[tokio::test]
async fn edit_vision_failure_falls_back_to_original_prompt() {
    let backend = ScriptedBackend::new();
    backend.script_content(Err(Error::Network("connection reset".to_string())));
    backend.script_image(Ok(sample_image()));

    let response = edit::generate(&backend, "make it night", &image_attachment()).await;
    assert!(!response.error);

    let requests = backend.image_requests.lock().unwrap();
    assert_eq!(requests[0].prompt, "make it night");
}

#[tokio::test]
async fn edit_both_stages_failing_still_yields_envelope() {
    let backend = ScriptedBackend::new();
    backend.script_content(Err(Error::Network("down".to_string())));
    backend.script_image(Err(Error::RateLimit));

    let response = edit::generate(&backend, "make it night", &image_attachment()).await;
    assert!(response.error);
    assert_eq!(response.domain, "Resource Limit");
}

// ============================================================================
// Speech
// ============================================================================

#[tokio::test]
async fn speech_success_is_audio_data_uri() {
    let backend = ScriptedBackend::new();
    backend.script_speech(Ok("UklGRg==".to_string()));

    let audio = speech::synthesize(&backend, "hello there").await;
    assert_eq!(audio.as_deref(), Some("data:audio/wav;base64,UklGRg=="));
}

#[tokio::test]
async fn speech_failure_is_none() {
    let backend = ScriptedBackend::new();
    backend.script_speech(Err(Error::Api("voice offline".to_string())));

    assert!(speech::synthesize(&backend, "hello").await.is_none());
}
