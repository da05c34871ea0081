//! Image synthesis wire types (`:predict`)

use crate::backend::{GeneratedImage, ImageRequest};
use crate::client::GeminiClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<ImageInstance>,
    parameters: ImageParameters,
}

#[derive(Debug, Serialize)]
struct ImageInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageParameters {
    sample_count: u32,
    aspect_ratio: String,
    output_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.config.image_model))]
    pub(crate) async fn generate_image_inner(
        &self,
        request: ImageRequest,
    ) -> Result<GeneratedImage> {
        let url = self.model_url(&self.config.image_model, "predict");
        let output_mime_type = request.output_mime_type.clone();
        let wire = PredictRequest {
            instances: vec![ImageInstance {
                prompt: request.prompt,
            }],
            parameters: ImageParameters {
                sample_count: request.sample_count,
                aspect_ratio: request.aspect_ratio,
                output_mime_type: request.output_mime_type,
            },
        };

        let body = self.post_json(&url, &wire).await?;
        let response: PredictResponse = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        // A 200 with no image bytes is still a failure
        let prediction = response
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("no predictions in response".to_string()))?;

        let data = prediction.bytes_base64_encoded.ok_or_else(|| {
            Error::InvalidResponse("image generation returned no image bytes".to_string())
        })?;

        debug!(bytes = data.len(), "image generated");
        Ok(GeneratedImage {
            data,
            mime_type: prediction.mime_type.unwrap_or(output_mime_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let wire = PredictRequest {
            instances: vec![ImageInstance {
                prompt: "a red sports car".to_string(),
            }],
            parameters: ImageParameters {
                sample_count: 1,
                aspect_ratio: "16:9".to_string(),
                output_mime_type: "image/jpeg".to_string(),
            },
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["instances"][0]["prompt"], "a red sports car");
        assert_eq!(json["parameters"]["sampleCount"], 1);
        assert_eq!(json["parameters"]["aspectRatio"], "16:9");
        assert_eq!(json["parameters"]["outputMimeType"], "image/jpeg");
    }

    #[test]
    fn test_response_parse() {
        let body = r#"{"predictions": [{"bytesBase64Encoded": "QUJD", "mimeType": "image/jpeg"}]}"#;
        let response: PredictResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.predictions[0].bytes_base64_encoded.as_deref(),
            Some("QUJD")
        );
    }

    #[test]
    fn test_empty_predictions_parse() {
        let response: PredictResponse = serde_json::from_str("{}").unwrap();
        assert!(response.predictions.is_empty());
    }
}
