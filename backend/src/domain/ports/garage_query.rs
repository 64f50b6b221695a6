//! Driving port for reading player state.

use async_trait::async_trait;

use crate::domain::{Error, PlayerProfile, TelegramId, TokenSnapshot};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GarageQuery: Send + Sync {
    /// Player, car, and balances for a Telegram user.
    async fn profile(&self, telegram_id: TelegramId) -> Result<PlayerProfile, Error>;

    /// Token balances of every player. Restricted to the administrator.
    async fn token_snapshot(&self, requester: TelegramId) -> Result<TokenSnapshot, Error>;
}
