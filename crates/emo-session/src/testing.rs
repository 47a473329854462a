//! Test doubles shared across module tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use emo_ml_client::{EmotionInference, InferenceError, InferenceResult};
use emo_models::{
    DetectEmotionResponse, FrameData, InferenceOutcome, InferenceSource, MusicPayload,
};

use crate::error::{SessionError, SessionResult};
use crate::frame_source::FrameSource;

pub fn frame() -> FrameData {
    FrameData::from_data_url("data:image/jpeg;base64,/9j/4AAQ").unwrap()
}

/// Returns the scripted labels in order, then repeats the last one.
pub struct ScriptedInference {
    labels: Mutex<VecDeque<&'static str>>,
}

impl ScriptedInference {
    pub fn new(labels: &[&'static str]) -> Self {
        Self {
            labels: Mutex::new(labels.iter().copied().collect()),
        }
    }
}

#[async_trait]
impl EmotionInference for ScriptedInference {
    async fn detect(&self, _frame: &FrameData) -> InferenceResult<InferenceOutcome> {
        let mut labels = self.labels.lock().unwrap();
        let label = if labels.len() > 1 {
            labels.pop_front().unwrap()
        } else {
            labels[0]
        };
        Ok(InferenceOutcome {
            response: DetectEmotionResponse {
                emotion: label.to_string(),
                confidence: 0.9,
                music: MusicPayload::new("Song", "Artist", 240.0),
                subject: None,
                timestamp: None,
                error: None,
            },
            source: InferenceSource::Remote,
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub struct FailingInference;

#[async_trait]
impl EmotionInference for FailingInference {
    async fn detect(&self, _frame: &FrameData) -> InferenceResult<InferenceOutcome> {
        Err(InferenceError::Service("model unavailable".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

pub struct PendingInference;

#[async_trait]
impl EmotionInference for PendingInference {
    async fn detect(&self, _frame: &FrameData) -> InferenceResult<InferenceOutcome> {
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "pending"
    }
}

/// Frame source yielding a fixed JPEG payload.
#[derive(Debug, Default)]
pub struct StaticFrameSource {
    started: AtomicBool,
    fail_start: bool,
    pub captures: AtomicUsize,
}

impl StaticFrameSource {
    pub fn denied() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl FrameSource for StaticFrameSource {
    async fn start(&self) -> SessionResult<()> {
        if self.fail_start {
            return Err(SessionError::capture(
                "Unable to access camera. Please check permissions.",
            ));
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) {
        self.started.store(false, Ordering::SeqCst);
    }

    async fn capture_frame(&self) -> SessionResult<Option<Vec<u8>>> {
        if !self.started.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(Some(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
