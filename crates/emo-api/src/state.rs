//! Application state.

use std::sync::Arc;

use emo_ml_client::{FailoverInference, FallbackGenerator, HttpInferenceClient, InferenceConfig};
use emo_session::{EmotionStore, SessionConfig, SystemClock};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<EmotionStore>,
}

impl AppState {
    pub fn new(config: ApiConfig, store: Arc<EmotionStore>) -> Self {
        Self { config, store }
    }

    /// Build the production store: HTTP inference with local fallback and
    /// the system clock, configured from the environment.
    pub fn from_env(config: ApiConfig) -> anyhow::Result<Self> {
        let inference_config = InferenceConfig::from_env()?;
        let client = HttpInferenceClient::new(&inference_config)?;
        let inference = FailoverInference::new(client, FallbackGenerator::new(&inference_config));

        let store = EmotionStore::new(
            SessionConfig::from_env(),
            Arc::new(inference),
            Arc::new(SystemClock),
        );

        Ok(Self::new(config, Arc::new(store)))
    }
}
