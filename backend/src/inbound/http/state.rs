//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    GarageCommand, GarageQuery, MarketplaceCommand, MarketplaceQuery, RaceCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub garage_query: Arc<dyn GarageQuery>,
    pub garage: Arc<dyn GarageCommand>,
    pub races: Arc<dyn RaceCommand>,
    pub marketplace: Arc<dyn MarketplaceCommand>,
    pub marketplace_query: Arc<dyn MarketplaceQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub garage_query: Arc<dyn GarageQuery>,
    pub garage: Arc<dyn GarageCommand>,
    pub races: Arc<dyn RaceCommand>,
    pub marketplace: Arc<dyn MarketplaceCommand>,
    pub marketplace_query: Arc<dyn MarketplaceQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use gunter_backend::domain::ports::ThreadRngDice;
    /// use gunter_backend::domain::{GarageService, MarketplaceService, RaceService};
    /// use gunter_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use gunter_backend::outbound::persistence::{
    ///     DbPool, DieselListingRepository, DieselPlayerRepository, PoolConfig,
    /// };
    ///
    /// # async fn build() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/gunter")).await?;
    /// let players = Arc::new(DieselPlayerRepository::new(pool.clone()));
    /// let listings = Arc::new(DieselListingRepository::new(pool));
    /// let dice = Arc::new(ThreadRngDice);
    /// let garage = Arc::new(GarageService::new(players.clone(), dice.clone(), None));
    /// let marketplace = Arc::new(MarketplaceService::new(players.clone(), listings));
    /// let state = HttpState::new(HttpStatePorts {
    ///     garage_query: garage.clone(),
    ///     garage,
    ///     races: Arc::new(RaceService::new(players, dice)),
    ///     marketplace: marketplace.clone(),
    ///     marketplace_query: marketplace,
    /// });
    /// let _races = state.races.clone();
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            garage_query,
            garage,
            races,
            marketplace,
            marketplace_query,
        } = ports;
        Self {
            garage_query,
            garage,
            races,
            marketplace,
            marketplace_query,
        }
    }
}
