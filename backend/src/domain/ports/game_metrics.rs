//! Port for counting race outcomes and marketplace sales.
//!
//! Services record through this port so the domain never depends on a
//! metrics backend. Recording is best effort; callers log failures and carry
//! on.

use async_trait::async_trait;

use crate::domain::ItemKind;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording game metrics.
    pub enum GameMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "game metrics exporter failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameMetrics: Send + Sync {
    /// Count one resolved bot race.
    async fn record_race(&self, is_winner: bool) -> Result<(), GameMetricsError>;

    /// Count one settled listing and the cash it moved.
    async fn record_sale(&self, item_kind: ItemKind, price: f64) -> Result<(), GameMetricsError>;
}

/// Discards every event. Used when metrics are disabled and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpGameMetrics;

#[async_trait]
impl GameMetrics for NoOpGameMetrics {
    async fn record_race(&self, _is_winner: bool) -> Result<(), GameMetricsError> {
        Ok(())
    }

    async fn record_sale(
        &self,
        _item_kind: ItemKind,
        _price: f64,
    ) -> Result<(), GameMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_accepts_every_event() {
        let metrics = NoOpGameMetrics;
        assert!(metrics.record_race(true).await.is_ok());
        assert!(metrics.record_sale(ItemKind::Car, 1200.0).await.is_ok());
    }

    #[test]
    fn error_constructor_accepts_str() {
        let err = GameMetricsError::export("registry closed");
        assert_eq!(err.to_string(), "game metrics exporter failed: registry closed");
    }
}
