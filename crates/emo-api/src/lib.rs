//! Axum HTTP API server for the emotion session engine.
//!
//! This crate provides:
//! - JSON endpoints over the observable engine state
//! - Snapshot submission, session reset and playback controls
//! - Request IDs, request logging and CORS
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
