//! Driving port for garage purchases and registration.
//!
//! Every operation debits cash only after the balance check passes; a
//! rejected request leaves the player untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DonationPackage, EngineTunePower, Error, NewPlayer, PartUpgrade, Performance, TelegramId,
    UpgradePart, ValveQuality, Wallet,
};

use super::Registration;

/// A part installation requested by a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRequest {
    pub telegram_id: TelegramId,
    pub upgrade: PartUpgrade,
}

/// Confirmation of an installed part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeReceipt {
    pub part: UpgradePart,
    pub level: u8,
    pub price: f64,
    pub wallet: Wallet,
    pub performance: Performance,
}

/// Result of a valve tuning attempt. The price is charged either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValveTuneOutcome {
    pub success: bool,
    /// Installed quality after the attempt, if the valves are tuned.
    pub quality: Option<ValveQuality>,
    pub price: f64,
    pub wallet: Wallet,
    pub performance: Performance,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineTuneOutcome {
    pub tune_power: EngineTunePower,
    pub price: f64,
    pub wallet: Wallet,
    pub performance: Performance,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonationReceipt {
    pub package: DonationPackage,
    pub wallet: Wallet,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GarageCommand: Send + Sync {
    /// Register on first contact; repeated calls return the existing player.
    async fn register(&self, player: NewPlayer) -> Result<Registration, Error>;

    async fn upgrade(&self, request: UpgradeRequest) -> Result<UpgradeReceipt, Error>;

    async fn tune_valves(&self, telegram_id: TelegramId) -> Result<ValveTuneOutcome, Error>;

    async fn tune_engine(&self, telegram_id: TelegramId) -> Result<EngineTuneOutcome, Error>;

    /// Credit the token package bought for `amount`.
    async fn donate(&self, telegram_id: TelegramId, amount: u32)
    -> Result<DonationReceipt, Error>;
}
