//! Scripted backend for strategy and orchestrator tests

use nexus_llm::{
    Error, GeneratedImage, GenerativeBackend, ImageRequest, Result, SpeechRequest, TextRequest,
    VideoOperation, VideoRequest,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Backend whose responses are scripted up front, in call order.
///
/// Unscripted calls fail loudly so a test never silently consumes a
/// default. Requests are recorded for assertion.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    pub content_results: Mutex<VecDeque<Result<String>>>,
    pub image_results: Mutex<VecDeque<Result<GeneratedImage>>>,
    pub start_results: Mutex<VecDeque<Result<VideoOperation>>>,
    pub poll_results: Mutex<VecDeque<Result<VideoOperation>>>,
    pub speech_results: Mutex<VecDeque<Result<String>>>,
    pub poll_count: AtomicUsize,
    pub content_requests: Mutex<Vec<TextRequest>>,
    pub image_requests: Mutex<Vec<ImageRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_content(&self, result: Result<String>) {
        self.content_results.lock().unwrap().push_back(result);
    }

    pub fn script_image(&self, result: Result<GeneratedImage>) {
        self.image_results.lock().unwrap().push_back(result);
    }

    pub fn script_start(&self, result: Result<VideoOperation>) {
        self.start_results.lock().unwrap().push_back(result);
    }

    pub fn script_poll(&self, result: Result<VideoOperation>) {
        self.poll_results.lock().unwrap().push_back(result);
    }

    pub fn script_speech(&self, result: Result<String>) {
        self.speech_results.lock().unwrap().push_back(result);
    }

    pub fn polls(&self) -> usize {
        self.poll_count.load(Ordering::SeqCst)
    }
}

fn unscripted<T>(what: &str) -> Result<T> {
    Err(Error::Api(format!("unscripted {what} call")))
}

#[async_trait::async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate_content(&self, request: TextRequest) -> Result<String> {
        self.content_requests.lock().unwrap().push(request);
        self.content_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("content"))
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage> {
        self.image_requests.lock().unwrap().push(request);
        self.image_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("image"))
    }

    async fn start_video(&self, _request: VideoRequest) -> Result<VideoOperation> {
        self.start_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("start_video"))
    }

    async fn poll_video(&self, _operation: &VideoOperation) -> Result<VideoOperation> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        self.poll_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("poll_video"))
    }

    async fn generate_speech(&self, _request: SpeechRequest) -> Result<String> {
        self.speech_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("speech"))
    }

    fn authorize_media_url(&self, url: &str) -> String {
        format!("{url}&key=test-key")
    }
}
