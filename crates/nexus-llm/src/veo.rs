//! Video synthesis wire types (`:predictLongRunning` + operation polling)
//!
//! Video jobs are long-running: submission returns an operation name, and
//! the caller polls the operation resource until `done`. Polling cadence
//! and deadlines are the caller's responsibility - each method here is a
//! single exchange.

use crate::backend::{VideoOperation, VideoRequest};
use crate::client::GeminiClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct LongRunningRequest {
    instances: Vec<VideoInstance>,
    parameters: VideoParameters,
}

#[derive(Debug, Serialize)]
struct VideoInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    sample_count: u32,
    resolution: String,
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationStatus {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<OperationResult>,
    #[serde(default)]
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResult {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl OperationStatus {
    fn into_operation(self) -> Result<VideoOperation> {
        if let Some(error) = self.error {
            return Err(Error::Api(format!(
                "video job failed ({}): {}",
                error.code, error.message
            )));
        }
        let result_uri = self
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|r| r.generated_samples.into_iter().next())
            .and_then(|s| s.video)
            .and_then(|v| v.uri);
        Ok(VideoOperation {
            name: self.name,
            done: self.done,
            result_uri,
        })
    }
}

impl GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.config.video_model))]
    pub(crate) async fn start_video_inner(&self, request: VideoRequest) -> Result<VideoOperation> {
        let url = self.model_url(&self.config.video_model, "predictLongRunning");
        let wire = LongRunningRequest {
            instances: vec![VideoInstance {
                prompt: request.prompt,
            }],
            parameters: VideoParameters {
                sample_count: request.sample_count,
                resolution: request.resolution,
                aspect_ratio: request.aspect_ratio,
            },
        };

        let body = self.post_json(&url, &wire).await?;
        let status: OperationStatus = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        debug!(operation = %status.name, "video job submitted");
        status.into_operation()
    }

    #[instrument(skip(self), fields(operation = %operation.name))]
    pub(crate) async fn poll_video_inner(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation> {
        let url = self.operation_url(&operation.name);
        let body = self.get_json(&url).await?;
        let status: OperationStatus = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        debug!(done = status.done, "video job polled");
        status.into_operation()
    }
}
