//! Player (user) aggregate: identity, wallet, garage tier and statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::car::Car;
use super::inventory::Inventory;

/// Internal database identifier of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(i64);

impl PlayerId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Telegram user identifier; trusted as given by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelegramId(i64);

impl TelegramId {
    /// Wrap a raw Telegram user id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TelegramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a debit exceeds the available balance.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("insufficient cash: {required:.0} required, {available:.0} available")]
pub struct InsufficientFunds {
    pub required: f64,
    pub available: f64,
}

/// Starting cash for new players.
pub const STARTING_CASH: f64 = 5000.0;

/// Currency balances of a player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub cash: f64,
    /// GTR token balance.
    pub tokens: f64,
    pub total_earned_tokens: f64,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            cash: STARTING_CASH,
            tokens: 0.0,
            total_earned_tokens: 0.0,
        }
    }
}

impl Wallet {
    /// Whether `amount` cash can be debited.
    #[must_use]
    pub fn can_afford(&self, amount: f64) -> bool {
        self.cash >= amount
    }

    /// Debit cash, checking the balance first so it never goes negative.
    pub fn debit_cash(&mut self, amount: f64) -> Result<(), InsufficientFunds> {
        if !self.can_afford(amount) {
            return Err(InsufficientFunds {
                required: amount,
                available: self.cash,
            });
        }
        self.cash -= amount;
        Ok(())
    }

    /// Debit up to `amount`, stopping at zero. Returns the amount taken.
    pub fn forfeit_cash(&mut self, amount: f64) -> f64 {
        let taken = amount.min(self.cash).max(0.0);
        self.cash -= taken;
        taken
    }

    pub fn credit_cash(&mut self, amount: f64) {
        self.cash += amount;
    }

    /// Credit GTR tokens and count them towards the lifetime total.
    pub fn credit_tokens(&mut self, amount: f64) {
        self.tokens += amount;
        self.total_earned_tokens += amount;
    }
}

/// Garage tier gating tuning odds and bot difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garage {
    pub level: u32,
    /// Number of cars the garage can hold.
    pub slots: u32,
}

impl Default for Garage {
    fn default() -> Self {
        Self { level: 1, slots: 2 }
    }
}

/// Cumulative win/loss statistics and reputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub races_won: u32,
    pub races_lost: u32,
    pub fights_won: u32,
    pub fights_lost: u32,
    /// Unbounded; may go negative.
    pub reputation: i32,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub telegram_id: TelegramId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub wallet: Wallet,
    pub garage: Garage,
    pub stats: PlayerStats,
    pub inventory: Inventory,
    pub created_at: DateTime<Utc>,
    /// Write counter. A save is rejected unless it matches the stored value.
    pub version: i64,
}

impl Player {
    /// Name used when addressing the player in chat.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("racer")
    }
}

/// Identity supplied on first contact with the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub telegram_id: TelegramId,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// A player together with their active car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player: Player,
    /// At most one active car per player.
    pub car: Option<Car>,
}
