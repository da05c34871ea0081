//! Error envelope constructor
//!
//! Converts any failure into a renderable, error-flagged structured
//! response. Classification is best-effort substring matching over the
//! error's textual description; it lives here, and only here, so the rules
//! can be swapped for structured backend error codes without touching call
//! sites.

use crate::response::{StructuredResponse, Widget, WidgetKind};
use std::fmt;
use tracing::warn;

/// Failure classification, in matching precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Quota or rate limit exhausted
    ResourceLimit,
    /// Content blocked by safety filtering
    SafetyProtocol,
    /// Transport-level failure
    NetworkError,
    /// Time budget exceeded or the request was cancelled
    Timeout,
    /// Anything else
    SystemFailure,
}

impl FailureClass {
    /// Classify an error description.
    ///
    /// First match wins; unmatched descriptions fall through to
    /// `SystemFailure`, never an error.
    #[must_use]
    pub fn classify(description: &str) -> Self {
        let lower = description.to_lowercase();
        if lower.contains("quota") || lower.contains("429") || lower.contains("rate limit") {
            Self::ResourceLimit
        } else if lower.contains("safety") || lower.contains("blocked") {
            Self::SafetyProtocol
        } else if lower.contains("network")
            || lower.contains("fetch")
            || lower.contains("connect")
            || lower.contains("unreachable")
        {
            Self::NetworkError
        } else if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("deadline")
            || lower.contains("cancel")
        {
            Self::Timeout
        } else {
            Self::SystemFailure
        }
    }

    /// Domain label shown for this failure class
    #[must_use]
    pub fn domain(&self) -> &'static str {
        match self {
            Self::ResourceLimit => "Resource Limit",
            Self::SafetyProtocol => "Safety Protocol",
            Self::NetworkError => "Network Error",
            Self::Timeout => "Timeout",
            Self::SystemFailure => "System Failure",
        }
    }

    /// Diagnostic narrative shown for this failure class
    #[must_use]
    pub fn narrative(&self) -> &'static str {
        match self {
            Self::ResourceLimit => {
                "API resource quota exceeded. Please wait a moment before retrying."
            }
            Self::SafetyProtocol => {
                "The request was flagged by safety protocols. Please adjust your prompt."
            }
            Self::NetworkError => "Network connection unstable. Unable to reach the AI core.",
            Self::Timeout => "The generation job exceeded its time budget and was abandoned.",
            Self::SystemFailure => "An unexpected disruption occurred in the neural link.",
        }
    }
}

/// Build the error-flagged envelope for a failed exchange
pub fn error_envelope(error: impl fmt::Display, context: &str) -> StructuredResponse {
    let description = error.to_string();
    warn!(context, error = %description, "generation failed");
    let class = FailureClass::classify(&description);

    StructuredResponse {
        narrative: class.narrative().to_string(),
        visual_cues: vec!["(error-glitch)".to_string(), "(fade-red)".to_string()],
        domain: class.domain().to_string(),
        impact_score: 0,
        analysis: format!("Error Details: {description}"),
        widgets: vec![Widget::text(
            WidgetKind::Summary,
            "Status Alert",
            "Process Terminated.",
        )],
        suggested_actions: vec![
            "Retry".to_string(),
            "Check Connection".to_string(),
            "Simplify Request".to_string(),
        ],
        export_options: Vec::new(),
        generated_media: None,
        error: true,
    }
}
