//! Video synthesis strategy
//!
//! Submits a long-running job and polls it at a fixed interval until
//! terminal. The loop is bounded by an explicit budget: a deadline and a
//! cancellation token, both of which resolve to a Timeout-classified
//! error envelope instead of polling forever.

use crate::envelope::error_envelope;
use crate::response::{GeneratedMedia, MediaKind, StructuredResponse};
use nexus_llm::{Error as BackendError, GenerativeBackend, VideoRequest};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Delay between job status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Ceiling on the total time spent waiting for one job
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);

/// Polling cadence and deadline for one video job
#[derive(Debug, Clone)]
pub struct PollBudget {
    /// Delay between status checks
    pub interval: Duration,
    /// Total wait ceiling
    pub max_wait: Duration,
    /// Cancels the wait early (host shutdown, user abort)
    pub cancel: CancellationToken,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            cancel: CancellationToken::new(),
        }
    }
}

/// Synthesize a single video, polling until terminal or out of budget
#[instrument(skip(backend, prompt, budget))]
pub async fn generate(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    budget: PollBudget,
) -> StructuredResponse {
    let mut operation = match backend.start_video(VideoRequest::new(prompt)).await {
        Ok(operation) => operation,
        Err(e) => return error_envelope(e, "video generation"),
    };

    let deadline = tokio::time::Instant::now() + budget.max_wait;

    while !operation.done {
        if tokio::time::Instant::now() >= deadline {
            return error_envelope(
                BackendError::Timeout(budget.max_wait.as_millis() as u64),
                "video generation",
            );
        }
        tokio::select! {
            _ = budget.cancel.cancelled() => {
                return error_envelope(
                    "video generation cancelled before the job finished",
                    "video generation",
                );
            }
            _ = tokio::time::sleep(budget.interval) => {}
        }
        operation = match backend.poll_video(&operation).await {
            Ok(operation) => operation,
            Err(e) => return error_envelope(e, "video generation"),
        };
        debug!(done = operation.done, "video job polled");
    }

    let uri = match operation.result_uri {
        Some(uri) if !uri.is_empty() => uri,
        _ => {
            return error_envelope(
                BackendError::InvalidResponse(
                    "video generation finished without a result uri".to_string(),
                ),
                "video generation",
            )
        }
    };
    let url = backend.authorize_media_url(&uri);

    StructuredResponse {
        narrative: "Visual sequence materialized. Rendering high-fidelity motion stream."
            .to_string(),
        visual_cues: vec!["(cinematic-fade)".to_string(), "(play-video)".to_string()],
        domain: "Video Production".to_string(),
        impact_score: 95,
        analysis: format!(
            "Generated 720p video based on prompt: \"{prompt}\". Model: Veo 3.1 Fast."
        ),
        widgets: Vec::new(),
        suggested_actions: vec![
            "Download Video".to_string(),
            "Generate Variations".to_string(),
            "Extend Clip".to_string(),
        ],
        export_options: vec!["MP4".to_string()],
        generated_media: Some(GeneratedMedia {
            kind: MediaKind::Video,
            url,
            mime_type: "video/mp4".to_string(),
        }),
        error: false,
    }
}
