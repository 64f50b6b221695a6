//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **metrics**: Prometheus counters for races and sales (`metrics` feature)
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **telegram**: Bot API client delivering chat replies
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod telegram;
