//! Car performance model.
//!
//! Converts a car's upgrade state into four derived statistics. Turbo, valve
//! and engine-tune bonuses are independent percentages of base power; they
//! add up rather than compound.

use serde::{Deserialize, Serialize};

use super::car::{EngineTunePower, SuspensionLevel, TurboLevel, ValveQuality};

/// Power produced by an engine with a 1.0 multiplier.
pub const BASE_POWER_PER_MULTIPLIER: f64 = 100.0;
/// Handling of a car on stock suspension before the bonus multiplier.
pub const STOCK_HANDLING: f64 = 5.0;
/// Fastest possible acceleration time; lower is faster.
pub const MIN_ACCELERATION: f64 = 3.0;
const STOCK_ACCELERATION: f64 = 10.0;
const POWER_PER_ACCELERATION_SECOND: f64 = 200.0;
const STOCK_TOP_SPEED: f64 = 150.0;
const POWER_PER_TOP_SPEED_UNIT: f64 = 3.0;
const VALVE_BASE_RATIO: f64 = 0.10;
const VALVE_QUALITY_RATIO: f64 = 0.20;

/// Snapshot of the car fields the calculator reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeState {
    pub engine_power_multiplier: f64,
    pub turbo_level: TurboLevel,
    /// `Some(quality)` when the valves are tuned.
    pub valves: Option<ValveQuality>,
    /// `Some(bonus)` when the engine is calibrated.
    pub engine_tune: Option<EngineTunePower>,
    pub suspension_level: SuspensionLevel,
    pub handling_bonus: f64,
}

impl UpgradeState {
    /// Individual power contributions.
    #[must_use]
    pub fn power_breakdown(&self) -> PowerBreakdown {
        let base = BASE_POWER_PER_MULTIPLIER * self.engine_power_multiplier;
        let turbo = base * self.turbo_level.boost_ratio();
        let valves = self.valves.map_or(0.0, |quality| {
            base * (VALVE_BASE_RATIO + quality.get() * VALVE_QUALITY_RATIO)
        });
        let tune = self.engine_tune.map_or(0.0, |bonus| base * bonus.get());
        PowerBreakdown {
            base,
            turbo,
            valves,
            tune,
        }
    }

    /// Handling after suspension gain and bonus multiplier.
    #[must_use]
    pub fn handling(&self) -> f64 {
        (STOCK_HANDLING + self.suspension_level.handling_gain()) * self.handling_bonus
    }

    /// Compute the derived statistics.
    ///
    /// # Examples
    /// ```
    /// use gunter_backend::domain::{SuspensionLevel, TurboLevel, UpgradeState};
    ///
    /// let state = UpgradeState {
    ///     engine_power_multiplier: 1.0,
    ///     turbo_level: TurboLevel::new(2).expect("valid turbo"),
    ///     valves: None,
    ///     engine_tune: None,
    ///     suspension_level: SuspensionLevel::default(),
    ///     handling_bonus: 1.0,
    /// };
    /// let perf = state.performance();
    /// assert!((perf.power - 130.0).abs() < 1e-9);
    /// assert!((perf.acceleration - 9.35).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn performance(&self) -> Performance {
        let power = self.power_breakdown().total();
        Performance {
            power,
            handling: self.handling(),
            acceleration: (STOCK_ACCELERATION - power / POWER_PER_ACCELERATION_SECOND)
                .max(MIN_ACCELERATION),
            top_speed: STOCK_TOP_SPEED + power / POWER_PER_TOP_SPEED_UNIT,
        }
    }
}

/// Power contributions that sum to the car's total power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerBreakdown {
    pub base: f64,
    pub turbo: f64,
    pub valves: f64,
    pub tune: f64,
}

impl PowerBreakdown {
    /// Sum of all contributions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.base + self.turbo + self.valves + self.tune
    }
}

/// Derived car statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub power: f64,
    pub handling: f64,
    /// Seconds to 100 km/h; never below [`MIN_ACCELERATION`].
    pub acceleration: f64,
    pub top_speed: f64,
}
