//! Render pipeline
//!
//! Maps a structured response onto typed widget views for the
//! presentation layer. Pure and stateless: rendering the same envelope
//! twice yields the same view sequence. Bad widget content renders
//! neutral/empty and never aborts the remaining widgets; unrecognized
//! widget kinds are skipped.

use crate::response::{
    parse_steps, GeneratedMedia, Step, StructuredResponse, Widget, WidgetContent, WidgetKind,
};
use serde_json::Value;
use tracing::debug;

/// One renderable view
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    /// Code snippet
    Code {
        /// Display title
        title: String,
        /// Code text
        text: String,
    },
    /// Ordered step list
    Steps {
        /// Display title
        title: String,
        /// Steps, in order
        steps: Vec<Step>,
    },
    /// Impact statement
    Impact {
        /// Display title
        title: String,
        /// Statement text
        text: String,
    },
    /// Chart placeholder (data visualization is presentation-side)
    Chart {
        /// Display title
        title: String,
    },
    /// Plain summary text
    Summary {
        /// Display title
        title: String,
        /// Summary text
        text: String,
    },
    /// Markup preview. Untrusted model output: hosts must render this in
    /// an isolated, script-free context.
    Prototype {
        /// Display title
        title: String,
        /// Raw markup
        markup: String,
    },
    /// Security assessment
    SecurityReport {
        /// Display title
        title: String,
        /// Assessment text
        text: String,
    },
}

/// Top-level display fields plus ordered widget views
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResponse {
    /// Classification label
    pub domain: String,
    /// Analysis text
    pub analysis: String,
    /// Impact score, 0-100
    pub impact_score: u8,
    /// Suggested follow-up actions
    pub suggested_actions: Vec<String>,
    /// Offered export formats
    pub export_options: Vec<String>,
    /// Generated media, if a synthesis strategy produced any
    pub media: Option<GeneratedMedia>,
    /// Error envelopes get the alert treatment
    pub alert: bool,
    /// Widget views, in envelope order
    pub views: Vec<WidgetView>,
}

/// Render a structured response into widget views
#[must_use]
pub fn render(response: &StructuredResponse) -> RenderedResponse {
    let views = response.widgets.iter().filter_map(render_widget).collect();
    RenderedResponse {
        domain: response.domain.clone(),
        analysis: response.analysis.clone(),
        impact_score: response.impact_score,
        suggested_actions: response.suggested_actions.clone(),
        export_options: response.export_options.clone(),
        media: response.generated_media.clone(),
        alert: response.error,
        views,
    }
}

fn render_widget(widget: &Widget) -> Option<WidgetView> {
    let title = widget.title.clone();
    match widget.kind {
        WidgetKind::Code => Some(WidgetView::Code {
            title,
            text: content_text(&widget.content),
        }),
        WidgetKind::Steps => Some(WidgetView::Steps {
            title,
            steps: content_steps(&widget.content),
        }),
        WidgetKind::Impact => Some(WidgetView::Impact {
            title,
            text: content_text(&widget.content),
        }),
        WidgetKind::Chart => Some(WidgetView::Chart { title }),
        WidgetKind::Summary => Some(WidgetView::Summary {
            title,
            text: content_text(&widget.content),
        }),
        WidgetKind::Prototype => Some(WidgetView::Prototype {
            title,
            markup: content_text(&widget.content),
        }),
        WidgetKind::SecurityReport => Some(WidgetView::SecurityReport {
            title,
            text: content_text(&widget.content),
        }),
        WidgetKind::Unknown => {
            debug!(title = %widget.title, "skipping unrecognized widget kind");
            None
        }
    }
}

fn content_text(content: &WidgetContent) -> String {
    match content {
        WidgetContent::Text(text) | WidgetContent::Markup(text) => text.clone(),
        WidgetContent::Empty | WidgetContent::Steps(_) => String::new(),
    }
}

/// Steps normally arrive normalized at parse time, but a string payload
/// reaching render is still tolerated: re-parse, empty on failure.
fn content_steps(content: &WidgetContent) -> Vec<Step> {
    match content {
        WidgetContent::Steps(steps) => steps.clone(),
        WidgetContent::Text(text) => parse_steps(&Value::String(text.clone())),
        WidgetContent::Empty | WidgetContent::Markup(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::parse_model_text;

    fn sample_response() -> StructuredResponse {
        parse_model_text(
            r#"{
                "narrative": "n", "domain": "Build", "impactScore": 70, "analysis": "a",
                "widgets": [
                    {"type": "code", "title": "Main", "content": "fn main() {}"},
                    {"type": "steps", "title": "Plan", "content": [{"title": "Step A", "description": "do it"}]},
                    {"type": "prototype", "title": "Preview", "content": "<div>hi</div>"},
                    {"type": "hologram", "title": "Future", "content": "x"},
                    {"type": "chart", "title": "Trend", "content": {"points": [1, 2]}}
                ],
                "suggestedActions": ["Go"]
            }"#,
        )
    }

    #[test]
    fn test_dispatch_and_unknown_skip() {
        let rendered = render(&sample_response());
        // 5 widgets in, 4 views out: the unknown kind is skipped
        assert_eq!(rendered.views.len(), 4);
        assert!(matches!(rendered.views[0], WidgetView::Code { .. }));
        match &rendered.views[1] {
            WidgetView::Steps { steps, .. } => {
                assert_eq!(steps[0].title, "Step A");
                assert_eq!(steps[0].description.as_deref(), Some("do it"));
            }
            other => panic!("expected steps, got {other:?}"),
        }
        assert_eq!(
            rendered.views[2],
            WidgetView::Prototype {
                title: "Preview".to_string(),
                markup: "<div>hi</div>".to_string()
            }
        );
        assert_eq!(
            rendered.views[3],
            WidgetView::Chart {
                title: "Trend".to_string()
            }
        );
        assert!(!rendered.alert);
        assert_eq!(rendered.domain, "Build");
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let response = sample_response();
        assert_eq!(render(&response), render(&response));
    }

    #[test]
    fn test_stringly_steps_are_reparsed() {
        let widget = Widget {
            kind: WidgetKind::Steps,
            title: "Plan".to_string(),
            content: WidgetContent::Text("[{\"title\":\"Step A\"}]".to_string()),
        };
        match render_widget(&widget) {
            Some(WidgetView::Steps { steps, .. }) => {
                assert_eq!(steps.len(), 1);
                assert_eq!(steps[0].title, "Step A");
            }
            other => panic!("expected steps, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_steps_render_empty_not_fatal() {
        let response = parse_model_text(
            r#"{
                "narrative": "n", "domain": "d", "impactScore": 1, "analysis": "a",
                "widgets": [
                    {"type": "steps", "title": "Broken", "content": "{{{not json"},
                    {"type": "summary", "title": "Still here", "content": "survived"}
                ],
                "suggestedActions": []
            }"#,
        );
        let rendered = render(&response);
        assert_eq!(rendered.views.len(), 2);
        assert!(
            matches!(&rendered.views[0], WidgetView::Steps { steps, .. } if steps.is_empty())
        );
        assert!(
            matches!(&rendered.views[1], WidgetView::Summary { text, .. } if text == "survived")
        );
    }

    #[test]
    fn test_error_envelope_renders_as_alert() {
        let envelope = crate::envelope::error_envelope("HTTP 429", "test");
        let rendered = render(&envelope);
        assert!(rendered.alert);
        assert_eq!(rendered.domain, "Resource Limit");
        assert_eq!(rendered.impact_score, 0);
        assert!(!rendered.suggested_actions.is_empty());
    }
}
