//! Service settings loaded via OrthoConfig from CLI flags, `GARAGE_*`
//! environment variables, and configuration files.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::TelegramId;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_WEBAPP_URL: &str = "http://localhost:8080";
const DEFAULT_TELEGRAM_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the garage backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GARAGE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Telegram bot token. The webhook is not mounted without one.
    pub bot_token: Option<String>,
    /// Base URL of the WebApp opened from chat buttons.
    pub webapp_url: Option<String>,
    /// Public base URL Telegram posts updates to. Defaults to the WebApp URL.
    pub public_url: Option<String>,
    /// Telegram user allowed to request airdrop snapshots.
    pub admin_telegram_id: Option<i64>,
    /// Call `setWebhook` on startup.
    #[ortho_config(default = false)]
    pub register_webhook: bool,
    /// Timeout for Bot API calls, in seconds.
    pub telegram_timeout_secs: Option<u64>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn webapp_url(&self) -> &str {
        self.webapp_url.as_deref().unwrap_or(DEFAULT_WEBAPP_URL)
    }

    /// Blank tokens count as absent.
    pub fn bot_token(&self) -> Option<&str> {
        self.bot_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Address registered with `setWebhook`.
    pub fn webhook_url(&self) -> String {
        let base = self.public_url.as_deref().unwrap_or_else(|| self.webapp_url());
        format!("{}/webhook", base.trim_end_matches('/'))
    }

    pub fn admin(&self) -> Option<TelegramId> {
        self.admin_telegram_id.map(TelegramId::new)
    }

    pub fn telegram_timeout(&self) -> Duration {
        Duration::from_secs(
            self.telegram_timeout_secs
                .unwrap_or(DEFAULT_TELEGRAM_TIMEOUT_SECS),
        )
    }
}
