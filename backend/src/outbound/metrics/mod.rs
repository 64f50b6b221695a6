//! Prometheus-backed implementations of the domain metrics ports.
//!
//! Compiled only with the `metrics` feature.

mod prometheus_game;

pub use prometheus_game::PrometheusGameMetrics;
