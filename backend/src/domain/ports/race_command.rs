//! Driving port for races.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, RaceOutcome, TelegramId, Wallet};

/// A resolved and applied race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceReport {
    pub outcome: RaceOutcome,
    /// Cash actually moved; a loss never takes more than the balance.
    pub cash_delta: f64,
    pub wallet: Wallet,
    pub reputation: i32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RaceCommand: Send + Sync {
    /// Race the scripted street bot.
    async fn race_bot(&self, telegram_id: TelegramId) -> Result<RaceReport, Error>;
}
