//! review-market/crates/api-adapters/src/lib.rs
//!
//! The HTTP surface. [`paths`] maps service locations to URLs and
//! [`metrics`] holds the Prometheus registry; the axum router itself lives
//! in [`web`] behind the `web-axum` feature.

pub mod metrics;
pub mod paths;

#[cfg(feature = "web-axum")]
pub mod web;

pub use metrics::Metrics;
