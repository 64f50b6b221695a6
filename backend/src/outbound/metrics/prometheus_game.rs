//! Prometheus adapter for race and marketplace counters.
//!
//! Counters are registered on the registry that `actix-web-prom` serves at
//! `/metrics`, next to the HTTP request metrics.

use async_trait::async_trait;
use prometheus::{CounterVec, IntCounterVec, Opts, Registry};

use crate::domain::ItemKind;
use crate::domain::ports::{GameMetrics, GameMetricsError};

/// Prometheus-backed [`GameMetrics`] recorder.
///
/// - `gunter_races_total{outcome="won"|"lost"}`
/// - `gunter_sales_total{item_kind}`
/// - `gunter_sales_cash_total{item_kind}`: sum of sale prices.
pub struct PrometheusGameMetrics {
    races_total: IntCounterVec,
    sales_total: IntCounterVec,
    sales_cash_total: CounterVec,
}

impl PrometheusGameMetrics {
    /// Create the counters and register them with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error when a counter with the same name is already
    /// registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let races_total = IntCounterVec::new(
            Opts::new("gunter_races_total", "Bot races resolved by outcome"),
            &["outcome"],
        )?;
        let sales_total = IntCounterVec::new(
            Opts::new("gunter_sales_total", "Marketplace listings sold by item kind"),
            &["item_kind"],
        )?;
        let sales_cash_total = CounterVec::new(
            Opts::new(
                "gunter_sales_cash_total",
                "Cash moved by marketplace sales by item kind",
            ),
            &["item_kind"],
        )?;
        registry.register(Box::new(races_total.clone()))?;
        registry.register(Box::new(sales_total.clone()))?;
        registry.register(Box::new(sales_cash_total.clone()))?;
        Ok(Self {
            races_total,
            sales_total,
            sales_cash_total,
        })
    }
}

#[async_trait]
impl GameMetrics for PrometheusGameMetrics {
    async fn record_race(&self, is_winner: bool) -> Result<(), GameMetricsError> {
        let outcome = if is_winner { "won" } else { "lost" };
        self.races_total.with_label_values(&[outcome]).inc();
        Ok(())
    }

    async fn record_sale(&self, item_kind: ItemKind, price: f64) -> Result<(), GameMetricsError> {
        if !price.is_finite() || price < 0.0 {
            return Err(GameMetricsError::export(format!(
                "sale price must be a non-negative number, got {price}"
            )));
        }
        let kind = item_kind.as_str();
        self.sales_total.with_label_values(&[kind]).inc();
        self.sales_cash_total.with_label_values(&[kind]).inc_by(price);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn metrics() -> (Registry, PrometheusGameMetrics) {
        let registry = Registry::new();
        let metrics = PrometheusGameMetrics::new(&registry).expect("counters register");
        (registry, metrics)
    }

    #[rstest]
    fn double_registration_is_rejected() {
        let (registry, _metrics) = metrics();
        assert!(PrometheusGameMetrics::new(&registry).is_err());
    }

    #[rstest]
    #[case(true, "won")]
    #[case(false, "lost")]
    #[tokio::test]
    async fn races_are_counted_by_outcome(#[case] is_winner: bool, #[case] label: &str) {
        let (_registry, metrics) = metrics();
        metrics.record_race(is_winner).await.expect("recorded");
        metrics.record_race(is_winner).await.expect("recorded");

        assert_eq!(metrics.races_total.with_label_values(&[label]).get(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn sales_count_items_and_cash() {
        let (registry, metrics) = metrics();
        metrics
            .record_sale(ItemKind::Car, 1200.0)
            .await
            .expect("recorded");
        metrics
            .record_sale(ItemKind::Car, 300.0)
            .await
            .expect("recorded");

        assert_eq!(metrics.sales_total.with_label_values(&["car"]).get(), 2);
        let cash = metrics.sales_cash_total.with_label_values(&["car"]).get();
        assert!((cash - 1500.0).abs() < 1e-9);
        assert!(
            registry
                .gather()
                .iter()
                .any(|family| family.name() == "gunter_sales_cash_total")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn negative_prices_are_rejected() {
        let (_registry, metrics) = metrics();
        let err = metrics
            .record_sale(ItemKind::Turbo, -1.0)
            .await
            .expect_err("invalid price");
        assert!(err.to_string().contains("non-negative"));
        assert_eq!(metrics.sales_total.with_label_values(&["turbo"]).get(), 0);
    }
}
