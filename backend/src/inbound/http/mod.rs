//! HTTP inbound adapter exposing the WebApp REST endpoints.

pub mod error;
pub mod garage;
pub mod health;
pub mod marketplace;
pub mod players;
pub mod races;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Every WebApp endpoint under `/api`. Handlers expect
/// `web::Data<state::HttpState>` in app data.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(players::get_player)
        .service(garage::tune_valves)
        .service(garage::tune_engine)
        .service(garage::upgrade_turbo)
        .service(garage::upgrade_suspension)
        .service(garage::upgrade_subwoofer)
        .service(races::race_bot)
        .service(marketplace::list_listings)
        .service(marketplace::get_listing)
        .service(marketplace::create_listing)
        .service(marketplace::buy_listing)
}
