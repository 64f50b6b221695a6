//! Prometheus wiring for the `metrics` feature.

use std::io;
use std::sync::Arc;

use actix_web_prom::PrometheusMetrics;
use gunter_backend::domain::ports::GameMetrics;
use gunter_backend::outbound::metrics::PrometheusGameMetrics;

/// HTTP middleware plus the game counters sharing its registry.
pub(super) struct MetricsWiring {
    pub(super) middleware: PrometheusMetrics,
    pub(super) game: Arc<dyn GameMetrics>,
}

/// Register the game counters on the middleware's registry.
///
/// # Errors
/// Fails when no Prometheus middleware was configured or a counter name is
/// already taken.
pub(super) fn wire_metrics(prometheus: Option<PrometheusMetrics>) -> io::Result<MetricsWiring> {
    let middleware = prometheus.ok_or_else(|| {
        io::Error::other("metrics feature enabled but no Prometheus middleware configured")
    })?;
    let game = PrometheusGameMetrics::new(&middleware.registry)
        .map_err(|e| io::Error::other(format!("game metrics registration failed: {e}")))?;
    Ok(MetricsWiring {
        middleware,
        game: Arc::new(game),
    })
}
