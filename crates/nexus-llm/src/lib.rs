//! Nexus LLM - Generative Backend Client
//!
//! This crate provides the generative-backend integration for Nexus:
//! - Backend: the `GenerativeBackend` trait and request/response types
//! - Client: reqwest-based Gemini client (config, auth, error mapping)
//! - Gemini: generateContent wire types (text/structured + speech)
//! - Imagen: image synthesis wire types
//! - Veo: long-running video synthesis job wire types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod client;
pub mod error;
pub mod gemini;
pub mod imagen;
pub mod util;
pub mod veo;

pub use backend::{
    ContentPart, GeneratedImage, GenerativeBackend, ImageRequest, SpeechRequest, TextRequest,
    VideoOperation, VideoRequest, DEFAULT_ASPECT_RATIO, DEFAULT_IMAGE_MIME,
    DEFAULT_VIDEO_RESOLUTION, DEFAULT_VOICE,
};
pub use client::{
    GeminiClient, GeminiConfig, DEFAULT_IMAGE_MODEL, DEFAULT_SPEECH_MODEL, DEFAULT_TEXT_MODEL,
    DEFAULT_VIDEO_MODEL,
};
pub use error::{Error, Result};
