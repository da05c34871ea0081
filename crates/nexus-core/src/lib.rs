//! Nexus Core - Response Orchestration and Rendering
//!
//! The core pipeline of the Nexus multi-mode assistant:
//! - Attachment: normalizes captured media into transport-ready payloads
//! - Mode: the closed registry of operating modes and strategy routing
//! - Response: the canonical structured envelope and its parsing policy
//! - Envelope: converts failures into renderable error envelopes
//! - Strategy: per-mode-family generation procedures (chat, image,
//!   video, edit, speech), each a failure boundary
//! - Orchestrator: single-flight send handling and message recording
//! - Conversation: the append-only message log
//! - Render: envelope to typed widget views, tolerant of bad payloads
//!
//! Data flow: capture -> attachment encoder -> orchestrator (mode
//! registry) -> generation strategy -> structured response ->
//! conversation log -> render pipeline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod attachment;
pub mod conversation;
pub mod envelope;
pub mod error;
pub mod mode;
pub mod orchestrator;
pub mod render;
pub mod response;
pub mod strategy;

pub use attachment::{Attachment, AttachmentKind};
pub use conversation::{ConversationState, Message, Role};
pub use envelope::{error_envelope, FailureClass};
pub use error::{Error, Result};
pub use mode::{resolve_strategy, Mode, StrategyKind};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use render::{render, RenderedResponse, WidgetView};
pub use response::{
    parse_model_text, schema_definition, strip_code_fences, GeneratedMedia, MediaKind, Step,
    StructuredResponse, Widget, WidgetContent, WidgetKind,
};
pub use strategy::{PollBudget, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};
