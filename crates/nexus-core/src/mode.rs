//! Mode registry
//!
//! The closed set of operating modes, each carrying a display label, a
//! per-mode instruction framing, and an implicit binding to exactly one
//! generation strategy family. Strategy resolution is a pure, total
//! function: every mode/attachment combination maps to a strategy, and
//! unmatched combinations fail closed to the conversational default.

use crate::attachment::{Attachment, AttachmentKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating mode selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Universal Solver - general research, analysis and creation
    Universal,
    /// Magic Build - rapid prototype construction
    Magic,
    /// App Architect - application design and scaffolding
    Architect,
    /// Video Studio - video synthesis
    Video,
    /// Image Studio - image synthesis
    Image,
    /// 3D Generator - volumetric-style image synthesis
    ThreeD,
    /// Media Editor - edit or transform supplied media
    Editor,
    /// File Converter - conversion scripts and guidance
    Converter,
    /// Security Guard - security and privacy assessment
    Security,
    /// Global Impact - societal impact analysis
    Impact,
    /// Educator - teaching and explanations
    Educator,
    /// Language Tutor - language learning
    Tutor,
    /// Fix My Life - personal coaching
    Life,
    /// Business Opt. - business optimization
    Business,
    /// Code Forge - code generation
    Code,
    /// Health Lens - health information
    Health,
    /// Accessible - accessibility-focused assistance
    Accessibility,
}

impl Mode {
    /// Every mode, in sidebar order
    pub const ALL: [Mode; 17] = [
        Mode::Universal,
        Mode::Magic,
        Mode::Architect,
        Mode::Video,
        Mode::Image,
        Mode::ThreeD,
        Mode::Editor,
        Mode::Converter,
        Mode::Security,
        Mode::Impact,
        Mode::Educator,
        Mode::Tutor,
        Mode::Life,
        Mode::Business,
        Mode::Code,
        Mode::Health,
        Mode::Accessibility,
    ];

    /// Human-facing label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Universal => "Universal Solver",
            Self::Magic => "Magic Build",
            Self::Architect => "App Architect",
            Self::Video => "Video Studio",
            Self::Image => "Image Studio",
            Self::ThreeD => "3D Generator",
            Self::Editor => "Media Editor",
            Self::Converter => "File Converter",
            Self::Security => "Security Guard",
            Self::Impact => "Global Impact",
            Self::Educator => "Educator",
            Self::Tutor => "Language Tutor",
            Self::Life => "Fix My Life",
            Self::Business => "Business Opt.",
            Self::Code => "Code Forge",
            Self::Health => "Health Lens",
            Self::Accessibility => "Accessible",
        }
    }

    /// Instruction framing for the conversational strategy.
    ///
    /// Alters only the instruction text, never the response schema.
    #[must_use]
    pub fn role_instruction(&self) -> &'static str {
        match self {
            Self::Architect => {
                "You are the CHIEF SOFTWARE ARCHITECT. Build apps. Return a 'prototype' \
                 widget for the main code, 'code' widgets for snippets."
            }
            Self::Security => {
                "You are a MILITARY-GRADE CYBERSECURITY EXPERT. Analyze permissions, code \
                 vulnerabilities, and privacy risks. Provide a 'security_report' widget."
            }
            Self::Converter => {
                "You are a UNIVERSAL FILE CONVERTER. Since you cannot process files \
                 directly, GENERATE PYTHON (ffmpeg/pandas/pillow) or NODE.JS scripts the \
                 user can run to convert their files. Explain the code."
            }
            Self::Editor => {
                "You are a MEDIA EDITOR. If no image is provided, ask for one. If text is \
                 provided, explain how you would edit it or write code to do so."
            }
            Self::ThreeD => {
                "You are a 3D MODELING ASSISTANT. If the user asks for an image, it is \
                 handled externally. If the user asks for OBJ/GLB code, generate Three.js \
                 code."
            }
            _ => "You are NEXUS, the universal intelligence. Research, analyze, create.",
        }
    }

    /// Input placeholder hint for the presentation layer
    #[must_use]
    pub fn input_hint(&self) -> &'static str {
        match self {
            Self::Video => "Describe the video you want to create...",
            Self::Image => "Describe the image you want to generate...",
            Self::Architect => "Describe the app you want to build (Mobile, Web, Desktop)...",
            _ => "Enter a command, upload media, or ask for analysis...",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Generation strategy family a request resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Structured chat (the default)
    Conversational,
    /// Image synthesis
    Image {
        /// Rewrite the prompt with the volumetric/3D stylistic prefix
        volumetric: bool,
    },
    /// Long-running video synthesis
    Video,
    /// Two-stage image-conditioned edit
    ImageEdit,
}

/// Resolve the strategy for a mode and staged attachment.
///
/// First match wins; everything unmatched falls through to the
/// conversational strategy.
#[must_use]
pub fn resolve_strategy(mode: Mode, attachment: Option<&Attachment>) -> StrategyKind {
    match (mode, attachment) {
        (Mode::Video, None) => StrategyKind::Video,
        (Mode::Image, None) => StrategyKind::Image { volumetric: false },
        (Mode::ThreeD, None) => StrategyKind::Image { volumetric: true },
        (Mode::Editor, Some(att)) if att.kind == AttachmentKind::Image => StrategyKind::ImageEdit,
        _ => StrategyKind::Conversational,
    }
}
