//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockGarageCommand, MockGarageQuery, MockMarketplaceCommand, MockMarketplaceQuery,
    MockRaceCommand,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mock ports with no expectations; any unexpected call panics the test.
#[derive(Default)]
pub struct MockPorts {
    pub garage_query: MockGarageQuery,
    pub garage: MockGarageCommand,
    pub races: MockRaceCommand,
    pub marketplace: MockMarketplaceCommand,
    pub marketplace_query: MockMarketplaceQuery,
}

impl MockPorts {
    pub fn into_data(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            garage_query: Arc::new(self.garage_query),
            garage: Arc::new(self.garage),
            races: Arc::new(self.races),
            marketplace: Arc::new(self.marketplace),
            marketplace_query: Arc::new(self.marketplace_query),
        }))
    }
}
