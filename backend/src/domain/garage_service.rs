//! Garage domain service: registration, profile reads, purchases, tuning,
//! and token packages.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    Dice, DonationReceipt, EngineTuneOutcome, GarageCommand, GarageQuery, PlayerPersistenceError,
    PlayerRepository, Registration, UpgradeReceipt, UpgradeRequest, ValveTuneOutcome,
};
use crate::domain::{
    Car, DonationPackage, ENGINE_TUNE_PRICE, Error, InsufficientFunds, NewPlayer, PlayerProfile,
    TelegramId, TokenSnapshot, VALVE_TUNE_PRICE, apply_engine_tune, apply_valve_tune,
    valve_tune_success_chance,
};

pub(crate) fn map_player_error(error: PlayerPersistenceError) -> Error {
    match error {
        PlayerPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("player repository unavailable: {message}"))
        }
        PlayerPersistenceError::Query { message } => {
            Error::internal(format!("player repository error: {message}"))
        }
        PlayerPersistenceError::Stale { message } => {
            Error::conflict(format!("player changed concurrently, retry: {message}"))
        }
    }
}

pub(crate) fn insufficient_funds(err: InsufficientFunds) -> Error {
    Error::insufficient_funds(err.to_string()).with_details(json!({
        "required": err.required,
        "available": err.available,
    }))
}

/// Load a registered player or fail with `not_found`.
pub(crate) async fn load_profile<P: PlayerRepository + ?Sized>(
    players: &P,
    telegram_id: TelegramId,
) -> Result<PlayerProfile, Error> {
    players
        .find_by_telegram_id(telegram_id)
        .await
        .map_err(map_player_error)?
        .ok_or_else(|| {
            Error::not_found(format!("player {telegram_id} is not registered"))
                .with_details(json!({ "telegramId": telegram_id.get() }))
        })
}

pub(crate) fn active_car(profile: &mut PlayerProfile) -> Result<&mut Car, Error> {
    let player_id = profile.player.id;
    profile
        .car
        .as_mut()
        .ok_or_else(|| Error::not_found(format!("player {player_id} has no active car")))
}

/// Garage service implementing [`GarageQuery`] and [`GarageCommand`].
#[derive(Clone)]
pub struct GarageService<P, D> {
    players: Arc<P>,
    dice: Arc<D>,
    admin: Option<TelegramId>,
}

impl<P, D> GarageService<P, D> {
    /// Create a service. `admin` may request token snapshots.
    pub fn new(players: Arc<P>, dice: Arc<D>, admin: Option<TelegramId>) -> Self {
        Self {
            players,
            dice,
            admin,
        }
    }
}

impl<P, D> GarageService<P, D>
where
    P: PlayerRepository,
    D: Dice,
{
    async fn save(&self, profile: &PlayerProfile) -> Result<(), Error> {
        self.players.save(profile).await.map_err(map_player_error)
    }
}

#[async_trait]
impl<P, D> GarageQuery for GarageService<P, D>
where
    P: PlayerRepository,
    D: Dice,
{
    async fn profile(&self, telegram_id: TelegramId) -> Result<PlayerProfile, Error> {
        load_profile(self.players.as_ref(), telegram_id).await
    }

    async fn token_snapshot(&self, requester: TelegramId) -> Result<TokenSnapshot, Error> {
        if self.admin != Some(requester) {
            return Err(Error::forbidden("token snapshots are restricted to the administrator"));
        }
        let holdings = self
            .players
            .token_balances()
            .await
            .map_err(map_player_error)?;
        Ok(TokenSnapshot::new(holdings))
    }
}

#[async_trait]
impl<P, D> GarageCommand for GarageService<P, D>
where
    P: PlayerRepository,
    D: Dice,
{
    async fn register(&self, player: NewPlayer) -> Result<Registration, Error> {
        let registration = self
            .players
            .register(&player)
            .await
            .map_err(map_player_error)?;
        if registration.created {
            info!(
                telegram_id = player.telegram_id.get(),
                player_id = registration.profile.player.id.get(),
                "registered player with starter car"
            );
        }
        Ok(registration)
    }

    async fn upgrade(&self, request: UpgradeRequest) -> Result<UpgradeReceipt, Error> {
        let mut profile = load_profile(self.players.as_ref(), request.telegram_id).await?;
        let upgrade = request.upgrade;
        let (part, level, price) = (upgrade.part(), upgrade.level(), upgrade.price());

        let car = active_car(&mut profile)?;
        upgrade
            .ensure_upgrade_of(&car.setup)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        profile
            .player
            .wallet
            .debit_cash(price)
            .map_err(insufficient_funds)?;
        let car = active_car(&mut profile)?;
        upgrade.apply(&mut car.setup);
        let performance = car.performance();

        self.save(&profile).await?;
        info!(
            telegram_id = request.telegram_id.get(),
            part = part.as_str(),
            level,
            price,
            "installed upgrade"
        );
        Ok(UpgradeReceipt {
            part,
            level,
            price,
            wallet: profile.player.wallet,
            performance,
        })
    }

    async fn tune_valves(&self, telegram_id: TelegramId) -> Result<ValveTuneOutcome, Error> {
        let mut profile = load_profile(self.players.as_ref(), telegram_id).await?;
        active_car(&mut profile)?;
        profile
            .player
            .wallet
            .debit_cash(VALVE_TUNE_PRICE)
            .map_err(insufficient_funds)?;

        let chance = valve_tune_success_chance(profile.player.garage.level);
        let success = self.dice.unit() < chance;
        let car = active_car(&mut profile)?;
        if success {
            apply_valve_tune(&mut car.setup, self.dice.unit());
        }
        let quality = car.setup.valves;
        let performance = car.performance();

        self.save(&profile).await?;
        info!(telegram_id = telegram_id.get(), success, "valve tuning attempted");
        Ok(ValveTuneOutcome {
            success,
            quality,
            price: VALVE_TUNE_PRICE,
            wallet: profile.player.wallet,
            performance,
        })
    }

    async fn tune_engine(&self, telegram_id: TelegramId) -> Result<EngineTuneOutcome, Error> {
        let mut profile = load_profile(self.players.as_ref(), telegram_id).await?;
        active_car(&mut profile)?;
        profile
            .player
            .wallet
            .debit_cash(ENGINE_TUNE_PRICE)
            .map_err(insufficient_funds)?;

        let car = active_car(&mut profile)?;
        let tune_power = apply_engine_tune(&mut car.setup, self.dice.unit());
        let performance = car.performance();

        self.save(&profile).await?;
        info!(
            telegram_id = telegram_id.get(),
            tune_power = tune_power.get(),
            "engine calibrated"
        );
        Ok(EngineTuneOutcome {
            tune_power,
            price: ENGINE_TUNE_PRICE,
            wallet: profile.player.wallet,
            performance,
        })
    }

    async fn donate(
        &self,
        telegram_id: TelegramId,
        amount: u32,
    ) -> Result<DonationReceipt, Error> {
        let package = DonationPackage::from_amount(amount).ok_or_else(|| {
            Error::invalid_request(format!("no token package costs {amount}")).with_details(
                json!({
                    "amounts": DonationPackage::ALL.map(DonationPackage::amount),
                }),
            )
        })?;
        let mut profile = load_profile(self.players.as_ref(), telegram_id).await?;
        profile.player.wallet.credit_tokens(package.tokens());

        self.save(&profile).await?;
        info!(
            telegram_id = telegram_id.get(),
            amount,
            tokens = package.tokens(),
            "token package credited"
        );
        Ok(DonationReceipt {
            package,
            wallet: profile.player.wallet,
        })
    }
}

#[cfg(test)]
#[path = "garage_service_tests.rs"]
mod tests;
