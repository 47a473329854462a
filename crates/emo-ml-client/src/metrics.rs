//! Inference metrics collection.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total inference requests by tier and outcome.
    pub const REQUESTS_TOTAL: &str = "emo_inference_requests_total";

    /// Total substitutions by the fallback generator, by cause.
    pub const FALLBACKS_TOTAL: &str = "emo_inference_fallbacks_total";

    /// Remote request latency in seconds.
    pub const LATENCY_SECONDS: &str = "emo_inference_latency_seconds";
}

/// Record a completed remote request.
pub fn record_request(outcome: &str, latency_secs: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "source" => "remote",
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(names::LATENCY_SECONDS).record(latency_secs);
}

/// Record a fallback substitution.
pub fn record_fallback(cause: &str) {
    counter!(names::FALLBACKS_TOTAL, "cause" => cause.to_string()).increment(1);
}
