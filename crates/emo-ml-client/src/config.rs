//! Inference client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{InferenceError, InferenceResult};

const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Inference client configuration.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL of the inference service
    pub backend_url: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Lower bound of the artificial fallback delay
    pub fallback_delay_min: Duration,
    /// Upper bound of the artificial fallback delay
    pub fallback_delay_max: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
            fallback_delay_min: Duration::from_millis(1000),
            fallback_delay_max: Duration::from_millis(2000),
        }
    }
}

impl InferenceConfig {
    /// Create config from environment variables.
    ///
    /// Read once at startup; `BACKEND_URL` falls back to a local address.
    pub fn from_env() -> InferenceResult<Self> {
        let backend_url = match std::env::var("BACKEND_URL") {
            Ok(raw) if !raw.trim().is_empty() => parse_backend_url(&raw)?,
            _ => default_backend_url(),
        };

        let timeout_secs: u64 = std::env::var("INFERENCE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let connect_timeout_secs: u64 = std::env::var("INFERENCE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);

        Ok(Self {
            backend_url,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            ..Self::default()
        })
    }

    /// Config pointing at a specific backend, other fields defaulted.
    pub fn with_backend(url: &str) -> InferenceResult<Self> {
        Ok(Self {
            backend_url: parse_backend_url(url)?,
            ..Self::default()
        })
    }

    /// Full URL of the detection endpoint.
    pub fn detect_url(&self) -> InferenceResult<Url> {
        self.backend_url
            .join("detect-emotion")
            .map_err(|e| InferenceError::Config(format!("Invalid detect URL: {}", e)))
    }
}

fn default_backend_url() -> Url {
    parse_backend_url(DEFAULT_BACKEND_URL).expect("default backend URL is valid")
}

/// Parse a base URL, forcing a trailing slash so `join` appends paths.
fn parse_backend_url(raw: &str) -> InferenceResult<Url> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&normalized)
        .map_err(|e| InferenceError::Config(format!("Invalid BACKEND_URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(InferenceError::Config(format!(
            "Unsupported BACKEND_URL scheme '{}'",
            other
        ))),
    }
}
