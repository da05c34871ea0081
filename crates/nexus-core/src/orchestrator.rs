//! Orchestrator
//!
//! Entry point for a send: resolves the strategy for the active mode and
//! staged attachment, invokes it, and guarantees exactly one terminal
//! outcome per request - one user message appended before dispatch, one
//! assistant message (success or error envelope) appended after, never
//! zero and never more. A single-flight gate rejects overlapping sends
//! rather than queueing them.

use crate::attachment::Attachment;
use crate::conversation::{ConversationState, Message};
use crate::error::{Error, Result};
use crate::mode::{resolve_strategy, Mode, StrategyKind};
use crate::response::StructuredResponse;
use crate::strategy::{chat, edit, image, speech, video, PollBudget};
use nexus_llm::GenerativeBackend;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Delay between video job status checks
    pub video_poll_interval: Duration,
    /// Ceiling on total wait for one video job
    pub video_max_wait: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            video_poll_interval: video::DEFAULT_POLL_INTERVAL,
            video_max_wait: video::DEFAULT_MAX_WAIT,
        }
    }
}

impl OrchestratorConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the video poll interval
    #[must_use]
    pub fn with_video_poll_interval(mut self, interval: Duration) -> Self {
        self.video_poll_interval = interval;
        self
    }

    /// Set the video wait ceiling
    #[must_use]
    pub fn with_video_max_wait(mut self, max_wait: Duration) -> Self {
        self.video_max_wait = max_wait;
        self
    }
}

/// Send-gate state: at most one request in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendState {
    Idle,
    Sending,
}

/// Returns the gate to Idle on drop, on every return path
struct SendGuard<'a> {
    gate: &'a Mutex<SendState>,
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.gate.lock() {
            *state = SendState::Idle;
        }
    }
}

/// Routes sends to generation strategies and owns the conversation log
pub struct Orchestrator {
    backend: Arc<dyn GenerativeBackend>,
    conversation: RwLock<ConversationState>,
    gate: Mutex<SendState>,
    config: OrchestratorConfig,
    shutdown: CancellationToken,
}

impl Orchestrator {
    /// Create an orchestrator with default configuration
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self::with_config(backend, OrchestratorConfig::default())
    }

    /// Create an orchestrator with explicit configuration
    #[must_use]
    pub fn with_config(backend: Arc<dyn GenerativeBackend>, config: OrchestratorConfig) -> Self {
        Self {
            backend,
            conversation: RwLock::new(ConversationState::new()),
            gate: Mutex::new(SendState::Idle),
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token the host can cancel to abandon in-flight long-running jobs
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Whether a send is currently in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.gate
            .lock()
            .map(|state| *state == SendState::Sending)
            .unwrap_or(false)
    }

    fn try_acquire(&self) -> Result<SendGuard<'_>> {
        let mut state = self.gate.lock().map_err(|_| Error::Busy)?;
        if *state == SendState::Sending {
            return Err(Error::Busy);
        }
        *state = SendState::Sending;
        Ok(SendGuard { gate: &self.gate })
    }

    /// Handle one send: route, generate, and record the exchange.
    ///
    /// The attachment is consumed by this call - a second send cannot
    /// reattach it. Rejects empty input and overlapping sends.
    #[instrument(skip(self, prompt, attachment), fields(mode = %mode))]
    pub async fn handle_send(
        &self,
        prompt: &str,
        mode: Mode,
        attachment: Option<Attachment>,
    ) -> Result<StructuredResponse> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() && attachment.is_none() {
            return Err(Error::EmptyInput);
        }
        let _guard = self.try_acquire()?;

        let display_text = match (&attachment, trimmed.is_empty()) {
            (Some(attachment), true) => format!("Analyze this {}", attachment.kind),
            _ => trimmed.to_string(),
        };

        self.conversation
            .write()
            .await
            .push_user(display_text.as_str(), attachment.clone());

        let strategy = resolve_strategy(mode, attachment.as_ref());
        info!(?strategy, "dispatching send");

        let backend = self.backend.as_ref();
        let response = match strategy {
            StrategyKind::Conversational => {
                chat::generate(backend, &display_text, mode, attachment.as_ref()).await
            }
            StrategyKind::Image { volumetric } => {
                image::generate(backend, &display_text, volumetric).await
            }
            StrategyKind::Video => {
                let budget = PollBudget {
                    interval: self.config.video_poll_interval,
                    max_wait: self.config.video_max_wait,
                    cancel: self.shutdown.child_token(),
                };
                video::generate(backend, &display_text, budget).await
            }
            StrategyKind::ImageEdit => match attachment.as_ref() {
                Some(attachment) => edit::generate(backend, &display_text, attachment).await,
                // resolve_strategy only yields ImageEdit with an image attached
                None => chat::generate(backend, &display_text, mode, None).await,
            },
        };

        self.conversation
            .write()
            .await
            .push_assistant(response.narrative.clone(), response.clone());

        Ok(response)
    }

    /// Narrate text as audio; `None` when speech is unavailable
    pub async fn speak(&self, text: &str) -> Option<String> {
        speech::synthesize(self.backend.as_ref(), text).await
    }

    /// Clone of the full message log
    pub async fn snapshot(&self) -> Vec<Message> {
        self.conversation.read().await.messages().to_vec()
    }

    /// Most recent structured response, for side-panel display
    pub async fn latest_analysis(&self) -> Option<StructuredResponse> {
        self.conversation.read().await.latest_analysis().cloned()
    }
}
