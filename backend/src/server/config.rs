//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use gunter_backend::domain::TelegramId;
use gunter_backend::domain::ports::BotMessenger;
use gunter_backend::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Chat delivery and WebApp link used by the Telegram webhook.
#[derive(Clone)]
pub struct BotConfig {
    pub(crate) messenger: Arc<dyn BotMessenger>,
    pub(crate) webapp_url: String,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) admin: Option<TelegramId>,
    pub(crate) bot: Option<BotConfig>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            admin: None,
            bot: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Telegram user allowed to request token snapshots.
    #[must_use]
    pub fn with_admin(mut self, admin: Option<TelegramId>) -> Self {
        self.admin = admin;
        self
    }

    /// Mount the Telegram webhook, replying through `messenger`.
    #[must_use]
    pub fn with_bot(
        mut self,
        messenger: Arc<dyn BotMessenger>,
        webapp_url: impl Into<String>,
    ) -> Self {
        self.bot = Some(BotConfig {
            messenger,
            webapp_url: webapp_url.into(),
        });
        self
    }

    #[cfg(feature = "metrics")]
    /// Serve `/metrics` and register the game counters on its registry.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}
