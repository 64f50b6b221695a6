//! Fixed price table for garage upgrades and tuning.

use serde::{Deserialize, Serialize};

/// Cost of a valve tuning attempt, charged whether or not it succeeds.
pub const VALVE_TUNE_PRICE: f64 = 300.0;
/// Cost of an engine calibration.
pub const ENGINE_TUNE_PRICE: f64 = 800.0;
/// Lower bound of the rolled engine tune bonus.
pub const ENGINE_TUNE_MIN_POWER: f64 = 0.05;

/// Upgradable car part with a level-based price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePart {
    Turbo,
    Suspension,
    Subwoofer,
}

impl UpgradePart {
    /// Price of installing `level`, or `None` outside `1..=3`.
    #[must_use]
    pub const fn price(self, level: u8) -> Option<f64> {
        let price = match (self, level) {
            (Self::Turbo, 1) => 1500.0,
            (Self::Turbo, 2) => 3500.0,
            (Self::Turbo, 3) => 7000.0,
            (Self::Suspension, 1) => 1000.0,
            (Self::Suspension, 2) => 2500.0,
            (Self::Suspension, 3) => 5000.0,
            (Self::Subwoofer, 1) => 500.0,
            (Self::Subwoofer, 2) => 1200.0,
            (Self::Subwoofer, 3) => 2500.0,
            _ => return None,
        };
        Some(price)
    }

    /// Stable name used in messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Turbo => "turbo",
            Self::Suspension => "suspension",
            Self::Subwoofer => "subwoofer",
        }
    }
}

/// Probability that a valve tuning attempt succeeds at `garage_level`.
#[must_use]
pub fn valve_tune_success_chance(garage_level: u32) -> f64 {
    (0.5 + 0.1 * f64::from(garage_level)).min(0.95)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UpgradePart::Turbo, 1, 1500.0)]
    #[case(UpgradePart::Turbo, 3, 7000.0)]
    #[case(UpgradePart::Suspension, 2, 2500.0)]
    #[case(UpgradePart::Subwoofer, 3, 2500.0)]
    fn price_table_lookup(#[case] part: UpgradePart, #[case] level: u8, #[case] expected: f64) {
        assert_eq!(part.price(level), Some(expected));
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    fn levels_outside_table_have_no_price(#[case] level: u8) {
        assert_eq!(UpgradePart::Turbo.price(level), None);
    }

    #[rstest]
    #[case(0, 0.5)]
    #[case(1, 0.6)]
    #[case(3, 0.8)]
    #[case(10, 0.95)]
    fn valve_odds_scale_with_garage_and_cap(#[case] level: u32, #[case] expected: f64) {
        assert!((valve_tune_success_chance(level) - expected).abs() < 1e-9);
    }
}
