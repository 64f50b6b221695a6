//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod bot_messenger;
mod dice;
mod game_metrics;
mod garage_command;
mod garage_query;
mod listing_repository;
mod marketplace_command;
mod marketplace_query;
mod player_repository;
mod race_command;

#[cfg(test)]
pub use bot_messenger::MockBotMessenger;
pub use bot_messenger::{
    BotMessenger, BotMessengerError, ButtonAction, ChatId, ChatReply, Keyboard, KeyboardButton,
};
#[cfg(test)]
pub use dice::MockDice;
pub use dice::{Dice, ThreadRngDice};
#[cfg(test)]
pub use game_metrics::MockGameMetrics;
pub use game_metrics::{GameMetrics, GameMetricsError, NoOpGameMetrics};
#[cfg(test)]
pub use garage_command::MockGarageCommand;
pub use garage_command::{
    DonationReceipt, EngineTuneOutcome, GarageCommand, UpgradeReceipt, UpgradeRequest,
    ValveTuneOutcome,
};
#[cfg(test)]
pub use garage_query::MockGarageQuery;
pub use garage_query::GarageQuery;
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingPersistenceError, ListingRepository, PurchaseSettlement};
#[cfg(test)]
pub use marketplace_command::MockMarketplaceCommand;
pub use marketplace_command::{CreateListingRequest, MarketplaceCommand, PurchaseReceipt};
#[cfg(test)]
pub use marketplace_query::MockMarketplaceQuery;
pub use marketplace_query::MarketplaceQuery;
#[cfg(test)]
pub use player_repository::MockPlayerRepository;
pub use player_repository::{PlayerPersistenceError, PlayerRepository, RaceRecord, Registration};
#[cfg(test)]
pub use race_command::MockRaceCommand;
pub use race_command::{RaceCommand, RaceReport};
