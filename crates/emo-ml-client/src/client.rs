//! HTTP client for the emotion-inference service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info_span, Instrument};
use url::Url;

use emo_models::{
    DetectEmotionRequest, DetectEmotionResponse, FrameData, InferenceOutcome, InferenceSource,
};

use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};
use crate::metrics::record_request;

/// Turns a captured frame into an emotion reading.
#[async_trait]
pub trait EmotionInference: Send + Sync {
    /// Analyze one frame.
    async fn detect(&self, frame: &FrameData) -> InferenceResult<InferenceOutcome>;

    /// Tier name for logging.
    fn name(&self) -> &'static str;
}

/// Client for `POST {backend}/detect-emotion`.
#[derive(Clone)]
pub struct HttpInferenceClient {
    http: Client,
    detect_url: Url,
}

impl HttpInferenceClient {
    /// Create a new inference client.
    pub fn new(config: &InferenceConfig) -> InferenceResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("emo-ml-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(InferenceError::Network)?;

        Ok(Self {
            http,
            detect_url: config.detect_url()?,
        })
    }

    /// Endpoint this client posts frames to.
    pub fn detect_url(&self) -> &Url {
        &self.detect_url
    }

    async fn post_frame(&self, frame: &FrameData) -> InferenceResult<DetectEmotionResponse> {
        let request = DetectEmotionRequest {
            image: frame.clone(),
        };

        let response = self
            .http
            .post(self.detect_url.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::from_http_status(status.as_u16(), body));
        }

        let body: DetectEmotionResponse = response.json().await?;
        validate_response(body)
    }
}

#[async_trait]
impl EmotionInference for HttpInferenceClient {
    async fn detect(&self, frame: &FrameData) -> InferenceResult<InferenceOutcome> {
        let span = info_span!(
            "inference.detect",
            url = %self.detect_url,
            frame_bytes = frame.payload_len()
        );

        async {
            let start = Instant::now();
            let result = self.post_frame(frame).await;
            let latency = start.elapsed().as_secs_f64();

            match &result {
                Ok(response) => {
                    record_request("ok", latency);
                    debug!(
                        emotion = %response.emotion,
                        confidence = response.confidence,
                        latency_ms = (latency * 1000.0) as u64,
                        "Backend response"
                    );
                }
                Err(e) => record_request(e.kind(), latency),
            }

            result.map(|response| InferenceOutcome {
                response,
                source: InferenceSource::Remote,
            })
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Reject bodies that carry an error marker or an unusable reading.
fn validate_response(body: DetectEmotionResponse) -> InferenceResult<DetectEmotionResponse> {
    if let Some(message) = body.error.as_deref() {
        return Err(InferenceError::Service(message.to_string()));
    }

    if body.emotion.trim().is_empty() {
        return Err(InferenceError::InvalidResponse(
            "empty emotion label".to_string(),
        ));
    }

    if !body.confidence.is_finite() {
        return Err(InferenceError::InvalidResponse(format!(
            "confidence is not a number: {}",
            body.confidence
        )));
    }

    Ok(body)
}
