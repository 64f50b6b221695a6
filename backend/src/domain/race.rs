//! Race resolution against the scripted street opponent.
//!
//! Both sides are scored with the same weighting and then multiplied by
//! independent noise in `[0.9, 1.1]`. The player wins only on a strictly
//! higher noisy score.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::performance::Performance;

/// Cash credited for a win.
pub const WIN_CASH_REWARD: f64 = 500.0;
/// GTR tokens credited for a win.
pub const WIN_TOKEN_REWARD: f64 = 5.0;
/// Cash forfeited on a loss, capped at the current balance.
pub const LOSS_CASH_PENALTY: f64 = 100.0;
/// Lower bound of the multiplicative noise.
pub const NOISE_MIN: f64 = 0.9;
/// Upper bound of the multiplicative noise.
pub const NOISE_MAX: f64 = 1.1;

const POWER_WEIGHT: f64 = 0.5;
const HANDLING_WEIGHT: f64 = 0.3;
const ACCELERATION_WEIGHT: f64 = 20.0;
const BOT_BASE_POWER: f64 = 120.0;
const BOT_POWER_PER_GARAGE_LEVEL: f64 = 20.0;
const BOT_HANDLING: f64 = 5.0;
const BOT_ACCELERATION: f64 = 12.0;

/// Raised when a noise factor falls outside `[0.9, 1.1]`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("race noise must be within [{NOISE_MIN}, {NOISE_MAX}], got {value}")]
pub struct NoiseOutOfRange {
    pub value: f64,
}

/// Independent noise factors for each side of a race.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceNoise {
    player: f64,
    bot: f64,
}

impl RaceNoise {
    /// Validate explicit noise factors.
    pub fn new(player: f64, bot: f64) -> Result<Self, NoiseOutOfRange> {
        for value in [player, bot] {
            if !(NOISE_MIN..=NOISE_MAX).contains(&value) {
                return Err(NoiseOutOfRange { value });
            }
        }
        Ok(Self { player, bot })
    }

    /// No noise on either side.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            player: 1.0,
            bot: 1.0,
        }
    }

    /// Draw both factors uniformly from `rng`.
    pub fn sample_with_rng(rng: &mut impl Rng) -> Self {
        Self {
            player: rng.gen_range(NOISE_MIN..=NOISE_MAX),
            bot: rng.gen_range(NOISE_MIN..=NOISE_MAX),
        }
    }

    #[must_use]
    pub const fn player(self) -> f64 {
        self.player
    }

    #[must_use]
    pub const fn bot(self) -> f64 {
        self.bot
    }
}

/// Weighted race score. Acceleration carries a positive weight.
#[must_use]
pub fn race_score(performance: &Performance) -> f64 {
    performance.power * POWER_WEIGHT
        + performance.handling * HANDLING_WEIGHT
        + performance.acceleration * ACCELERATION_WEIGHT
}

/// Statistics of the scripted opponent for a garage level.
#[must_use]
pub fn bot_baseline(garage_level: u32) -> Performance {
    let power = BOT_BASE_POWER + f64::from(garage_level) * BOT_POWER_PER_GARAGE_LEVEL;
    Performance {
        power,
        handling: BOT_HANDLING,
        acceleration: BOT_ACCELERATION,
        top_speed: 0.0,
    }
}

/// Result of a resolved race, before it is applied to the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceOutcome {
    pub is_winner: bool,
    pub player_score: f64,
    pub bot_score: f64,
    /// Nominal cash change; a loss is capped at the balance when applied.
    pub cash_delta: f64,
    pub token_delta: f64,
}

/// Resolve a race with explicit noise.
#[must_use]
pub fn resolve_race(performance: &Performance, garage_level: u32, noise: RaceNoise) -> RaceOutcome {
    let player_score = race_score(performance) * noise.player();
    let bot_score = race_score(&bot_baseline(garage_level)) * noise.bot();
    let is_winner = player_score > bot_score;
    let (cash_delta, token_delta) = if is_winner {
        (WIN_CASH_REWARD, WIN_TOKEN_REWARD)
    } else {
        (-LOSS_CASH_PENALTY, 0.0)
    };
    RaceOutcome {
        is_winner,
        player_score,
        bot_score,
        cash_delta,
        token_delta,
    }
}
