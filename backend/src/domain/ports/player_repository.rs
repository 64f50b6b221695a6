//! Port abstraction for player and car persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{NewPlayer, PlayerId, PlayerProfile, TelegramId, TokenHolding};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by player repository adapters.
    pub enum PlayerPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "player repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "player repository query failed: {message}",
        /// The stored player changed since this copy was loaded.
        Stale { message: String } => "player repository rejected a stale write: {message}",
    }
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub profile: PlayerProfile,
    /// `false` when the player already existed.
    pub created: bool,
}

/// A bot race to append to the race history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceRecord {
    pub player_id: PlayerId,
    /// `None` for races against the scripted bot.
    pub opponent_id: Option<PlayerId>,
    /// `None` when the bot won.
    pub winner_id: Option<PlayerId>,
    pub bet_amount: f64,
    pub raced_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Load a player and their active car.
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<PlayerProfile>, PlayerPersistenceError>;

    /// Create the player and their starter car together, or return the
    /// existing profile untouched.
    async fn register(&self, player: &NewPlayer) -> Result<Registration, PlayerPersistenceError>;

    /// Persist balances, stats, inventory, and the car in one transaction.
    ///
    /// Fails with `Stale` when another write bumped the player's version
    /// after `profile` was loaded.
    async fn save(&self, profile: &PlayerProfile) -> Result<(), PlayerPersistenceError>;

    /// Persist the profile and append a race history row atomically.
    async fn save_race(
        &self,
        profile: &PlayerProfile,
        record: &RaceRecord,
    ) -> Result<(), PlayerPersistenceError>;

    /// Token balance of every registered player.
    async fn token_balances(&self) -> Result<Vec<TokenHolding>, PlayerPersistenceError>;
}
