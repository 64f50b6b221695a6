//! Gunter Life garage backend.
//!
//! - [`domain`]: performance model, race resolver, price tables, services,
//!   and ports.
//! - [`inbound`]: the WebApp HTTP API and the Telegram webhook.
//! - [`outbound`]: PostgreSQL repositories and the Telegram Bot API client.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
