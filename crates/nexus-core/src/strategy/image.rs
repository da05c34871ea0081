//! Image synthesis strategy
//!
//! One image at a fixed aspect ratio, wrapped as a data URI. The
//! volumetric flag rewrites the prompt with a fixed 3D-render stylistic
//! prefix before dispatch.

use crate::envelope::error_envelope;
use crate::response::{GeneratedMedia, MediaKind, StructuredResponse};
use nexus_llm::{GenerativeBackend, ImageRequest};
use tracing::instrument;

/// Stylistic prefix applied in volumetric/3D mode
const VOLUMETRIC_PREFIX: &str = "3D render, high fidelity, unreal engine 5 style, isometric, \
                                 volumetric lighting, 8k resolution: ";

/// Synthesize a single image
#[instrument(skip(backend, prompt))]
pub async fn generate(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    volumetric: bool,
) -> StructuredResponse {
    let final_prompt = if volumetric {
        format!("{VOLUMETRIC_PREFIX}{prompt}")
    } else {
        prompt.to_string()
    };

    match backend.generate_image(ImageRequest::new(final_prompt)).await {
        Ok(image) => {
            let url = format!("data:{};base64,{}", image.mime_type, image.data);
            StructuredResponse {
                narrative: if volumetric {
                    "3D Topology constructed. Rendering volumetric assets."
                } else {
                    "Visual asset visualized. High-resolution render complete."
                }
                .to_string(),
                visual_cues: vec!["(flash)".to_string(), "(reveal-image)".to_string()],
                domain: if volumetric { "3D Modeling" } else { "Creative Studio" }.to_string(),
                impact_score: 88,
                analysis: format!(
                    "Generated {} for: \"{}\". Model: Imagen 3.0.",
                    if volumetric { "3D Render" } else { "Image" },
                    prompt
                ),
                widgets: Vec::new(),
                suggested_actions: vec![
                    "Upscale".to_string(),
                    "Edit Image".to_string(),
                    "Save to Gallery".to_string(),
                ],
                export_options: vec!["JPEG".to_string(), "PNG".to_string()],
                generated_media: Some(GeneratedMedia {
                    kind: MediaKind::Image,
                    url,
                    mime_type: image.mime_type,
                }),
                error: false,
            }
        }
        Err(e) => error_envelope(e, "image generation"),
    }
}
