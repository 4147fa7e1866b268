//! Axum HTTP server for the smile booth.
//!
//! This crate provides:
//! - The booth page with the capture gallery
//! - `/detect` and `/save` JSON endpoints
//! - Static serving of stored captures
//! - Health/readiness probes and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod page;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
