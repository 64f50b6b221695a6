//! Builders wiring repositories into services and services into the
//! inbound adapters' state.

use std::sync::Arc;

use actix_web::web;

use gunter_backend::domain::ports::{
    Dice, GameMetrics, ListingRepository, PlayerRepository, ThreadRngDice,
};
use gunter_backend::domain::{GarageService, MarketplaceService, RaceService, TelegramId};
use gunter_backend::inbound::http::state::{HttpState, HttpStatePorts};
use gunter_backend::inbound::telegram::{BotDispatcher, BotPorts};
use gunter_backend::outbound::persistence::{DieselListingRepository, DieselPlayerRepository};

use super::{BotConfig, ServerConfig};

/// Build the service ports over any repository pair.
fn build_ports<P, L, D>(
    players: Arc<P>,
    listings: Arc<L>,
    dice: Arc<D>,
    admin: Option<TelegramId>,
    metrics: Arc<dyn GameMetrics>,
) -> HttpStatePorts
where
    P: PlayerRepository + 'static,
    L: ListingRepository + 'static,
    D: Dice + 'static,
{
    let garage = Arc::new(GarageService::new(players.clone(), dice.clone(), admin));
    let marketplace = Arc::new(MarketplaceService::with_metrics(
        players.clone(),
        listings,
        metrics.clone(),
    ));
    HttpStatePorts {
        garage_query: garage.clone(),
        garage,
        races: Arc::new(RaceService::with_metrics(players, dice, metrics)),
        marketplace: marketplace.clone(),
        marketplace_query: marketplace,
    }
}

/// Ports backed by PostgreSQL repositories and thread-local randomness.
pub(super) fn build_diesel_ports(
    config: &ServerConfig,
    metrics: Arc<dyn GameMetrics>,
) -> HttpStatePorts {
    build_ports(
        Arc::new(DieselPlayerRepository::new(config.db_pool.clone())),
        Arc::new(DieselListingRepository::new(config.db_pool.clone())),
        Arc::new(ThreadRngDice),
        config.admin,
        metrics,
    )
}

/// Telegram dispatcher sharing the garage services with the HTTP API.
pub(super) fn build_bot_dispatcher(
    ports: &HttpStatePorts,
    bot: Option<&BotConfig>,
) -> Option<web::Data<BotDispatcher>> {
    bot.map(|bot| {
        web::Data::new(BotDispatcher::new(
            BotPorts {
                garage_query: ports.garage_query.clone(),
                garage: ports.garage.clone(),
                messenger: bot.messenger.clone(),
            },
            bot.webapp_url.clone(),
        ))
    })
}

pub(super) fn build_http_state(ports: HttpStatePorts) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(ports))
}
