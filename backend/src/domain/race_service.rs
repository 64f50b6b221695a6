//! Race domain service: resolves a bot race and applies its rewards.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::ports::{
    Dice, GameMetrics, NoOpGameMetrics, PlayerRepository, RaceCommand, RaceRecord, RaceReport,
};
use crate::domain::{Error, LOSS_CASH_PENALTY, PlayerProfile, RaceOutcome, TelegramId, resolve_race};

use super::garage_service::{active_car, load_profile, map_player_error};

/// Apply an outcome to the player and return the cash actually moved.
fn apply_outcome(profile: &mut PlayerProfile, outcome: &RaceOutcome) -> f64 {
    let player = &mut profile.player;
    if outcome.is_winner {
        player.wallet.credit_cash(outcome.cash_delta);
        player.wallet.credit_tokens(outcome.token_delta);
        player.stats.races_won += 1;
        player.stats.reputation += 1;
        outcome.cash_delta
    } else {
        let taken = player.wallet.forfeit_cash(LOSS_CASH_PENALTY);
        player.stats.races_lost += 1;
        player.stats.reputation -= 1;
        -taken
    }
}

/// Race service implementing [`RaceCommand`].
///
/// `M` counts outcomes; [`NoOpGameMetrics`] when nothing is exported.
#[derive(Clone)]
pub struct RaceService<P, D, M: ?Sized = NoOpGameMetrics> {
    players: Arc<P>,
    dice: Arc<D>,
    metrics: Arc<M>,
}

impl<P, D> RaceService<P, D> {
    pub fn new(players: Arc<P>, dice: Arc<D>) -> Self {
        Self::with_metrics(players, dice, Arc::new(NoOpGameMetrics))
    }
}

impl<P, D, M: ?Sized> RaceService<P, D, M> {
    pub fn with_metrics(players: Arc<P>, dice: Arc<D>, metrics: Arc<M>) -> Self {
        Self {
            players,
            dice,
            metrics,
        }
    }
}

#[async_trait]
impl<P, D, M> RaceCommand for RaceService<P, D, M>
where
    P: PlayerRepository,
    D: Dice,
    M: GameMetrics + ?Sized,
{
    async fn race_bot(&self, telegram_id: TelegramId) -> Result<RaceReport, Error> {
        let mut profile = load_profile(self.players.as_ref(), telegram_id).await?;
        let performance = active_car(&mut profile)?.performance();
        let garage_level = profile.player.garage.level;

        let outcome = resolve_race(&performance, garage_level, self.dice.race_noise());
        let cash_delta = apply_outcome(&mut profile, &outcome);

        let player_id = profile.player.id;
        let record = RaceRecord {
            player_id,
            opponent_id: None,
            winner_id: outcome.is_winner.then_some(player_id),
            bet_amount: 0.0,
            raced_at: Utc::now(),
        };
        self.players
            .save_race(&profile, &record)
            .await
            .map_err(map_player_error)?;

        info!(
            telegram_id = telegram_id.get(),
            is_winner = outcome.is_winner,
            player_score = outcome.player_score,
            bot_score = outcome.bot_score,
            "bot race resolved"
        );
        if let Err(err) = self.metrics.record_race(outcome.is_winner).await {
            warn!(error = %err, "race metric not recorded");
        }
        Ok(RaceReport {
            outcome,
            cash_delta,
            wallet: profile.player.wallet,
            reputation: profile.player.stats.reputation,
        })
    }
}
