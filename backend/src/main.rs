//! Backend entry-point: loads settings, prepares the database, optionally
//! registers the Telegram webhook, and serves the HTTP API.

mod server;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gunter_backend::inbound::http::health::HealthState;
use gunter_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use gunter_backend::outbound::telegram::TelegramClient;
use gunter_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|e| io::Error::other(format!("invalid settings: {e}")))?;
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|e| {
        io::Error::other(format!("invalid bind address {}: {e}", settings.bind_addr()))
    })?;
    let database_url = settings
        .database_url
        .clone()
        .ok_or_else(|| io::Error::other("GARAGE_DATABASE_URL must be set"))?;

    let applied = run_pending_migrations(database_url.clone())
        .await
        .map_err(io::Error::other)?;
    info!(applied, "database migrations applied");

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(io::Error::other)?;

    let mut config = ServerConfig::new(bind_addr, pool).with_admin(settings.admin());
    match settings.bot_token() {
        Some(token) => {
            let client =
                TelegramClient::new(token, settings.telegram_timeout()).map_err(io::Error::other)?;
            if settings.register_webhook {
                register_webhook(&client, &settings.webhook_url()).await;
            }
            config = config.with_bot(Arc::new(client), settings.webapp_url());
        }
        None => warn!("GARAGE_BOT_TOKEN is not set; Telegram webhook disabled"),
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics()?);

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    create_server(health_state, config)?.await
}

/// A failed registration leaves the previous webhook in place, so the
/// server still starts.
async fn register_webhook(client: &TelegramClient, url: &str) {
    match client.set_webhook(url).await {
        Ok(()) => info!(url, "Telegram webhook registered"),
        Err(err) => warn!(url, error = %err, "Telegram webhook registration failed"),
    }
}

#[cfg(feature = "metrics")]
fn make_metrics() -> io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("gunter")
        .endpoint("/metrics")
        .build()
        .map_err(|e| io::Error::other(format!("configure Prometheus metrics: {e}")))
}
