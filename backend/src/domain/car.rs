//! Car entity and the validated upgrade levels it carries.
//!
//! Levels are newtypes so an out-of-range turbo or suspension can never reach
//! the performance calculator. The raw columns are validated once, when the
//! persistence adapter rebuilds a [`Car`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::performance::{Performance, UpgradeState};
use super::player::PlayerId;

/// Validation errors raised when constructing car upgrade values.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CarValidationError {
    #[error("turbo level must be between 0 and {max}, got {level}")]
    TurboLevelOutOfRange { level: u8, max: u8 },
    #[error("suspension level must be between 0 and {max}, got {level}")]
    SuspensionLevelOutOfRange { level: u8, max: u8 },
    #[error("subwoofer level must be between 0 and {max}, got {level}")]
    SubwooferLevelOutOfRange { level: u8, max: u8 },
    #[error("valve quality must be within [0, 1], got {quality}")]
    ValveQualityOutOfRange { quality: f64 },
    #[error("engine tune power must be within [0, {max}], got {power}")]
    EngineTunePowerOutOfRange { power: f64, max: f64 },
    #[error("engine power multiplier must be a non-negative number, got {multiplier}")]
    InvalidPowerMultiplier { multiplier: f64 },
}

/// Database identifier of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(i64);

impl CarId {
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

impl std::fmt::Display for CarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Highest purchasable level for turbo, suspension, and subwoofer parts.
pub const MAX_PART_LEVEL: u8 = 3;

/// Installed turbo level, `0..=3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TurboLevel(u8);

impl TurboLevel {
    /// Validate a raw turbo level.
    pub fn new(level: u8) -> Result<Self, CarValidationError> {
        if level > MAX_PART_LEVEL {
            return Err(CarValidationError::TurboLevelOutOfRange {
                level,
                max: MAX_PART_LEVEL,
            });
        }
        Ok(Self(level))
    }

    /// Raw level value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Fraction of base power added by this turbo.
    #[must_use]
    pub const fn boost_ratio(self) -> f64 {
        match self.0 {
            1 => 0.15,
            2 => 0.30,
            3 => 0.50,
            _ => 0.0,
        }
    }
}

impl TryFrom<u8> for TurboLevel {
    type Error = CarValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TurboLevel> for u8 {
    fn from(value: TurboLevel) -> Self {
        value.0
    }
}

/// Installed suspension level, `0..=3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SuspensionLevel(u8);

impl SuspensionLevel {
    /// Validate a raw suspension level.
    pub fn new(level: u8) -> Result<Self, CarValidationError> {
        if level > MAX_PART_LEVEL {
            return Err(CarValidationError::SuspensionLevelOutOfRange {
                level,
                max: MAX_PART_LEVEL,
            });
        }
        Ok(Self(level))
    }

    /// Raw level value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Handling points added on top of the stock 5.0.
    #[must_use]
    pub const fn handling_gain(self) -> f64 {
        match self.0 {
            1 => 1.5,
            2 => 3.0,
            3 => 5.0,
            _ => 0.0,
        }
    }

    /// Handling multiplier applied when this suspension is installed.
    #[must_use]
    pub const fn handling_bonus(self) -> f64 {
        match self.0 {
            1 => 1.2,
            2 => 1.4,
            3 => 1.7,
            _ => 1.0,
        }
    }
}

impl TryFrom<u8> for SuspensionLevel {
    type Error = CarValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SuspensionLevel> for u8 {
    fn from(value: SuspensionLevel) -> Self {
        value.0
    }
}

/// Installed subwoofer level, `0..=3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SubwooferLevel(u8);

impl SubwooferLevel {
    /// Validate a raw subwoofer level.
    pub fn new(level: u8) -> Result<Self, CarValidationError> {
        if level > MAX_PART_LEVEL {
            return Err(CarValidationError::SubwooferLevelOutOfRange {
                level,
                max: MAX_PART_LEVEL,
            });
        }
        Ok(Self(level))
    }

    /// Raw level value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Amplifier output in watts for this level.
    #[must_use]
    pub const fn power_watts(self) -> u32 {
        match self.0 {
            1 => 300,
            2 => 600,
            3 => 1000,
            _ => 0,
        }
    }
}

impl TryFrom<u8> for SubwooferLevel {
    type Error = CarValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubwooferLevel> for u8 {
    fn from(value: SubwooferLevel) -> Self {
        value.0
    }
}

/// Valve tuning quality in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ValveQuality(f64);

impl ValveQuality {
    /// Validate a raw quality value.
    pub fn new(quality: f64) -> Result<Self, CarValidationError> {
        if !(0.0..=1.0).contains(&quality) {
            return Err(CarValidationError::ValveQualityOutOfRange { quality });
        }
        Ok(Self(quality))
    }

    /// Raw quality value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ValveQuality {
    type Error = CarValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ValveQuality> for f64 {
    fn from(value: ValveQuality) -> Self {
        value.0
    }
}

/// Upper bound of the engine tune bonus.
pub const MAX_ENGINE_TUNE_POWER: f64 = 0.25;

/// Engine calibration bonus as a fraction of base power, `[0, 0.25]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct EngineTunePower(f64);

impl EngineTunePower {
    /// Validate a raw tune bonus.
    pub fn new(power: f64) -> Result<Self, CarValidationError> {
        if !(0.0..=MAX_ENGINE_TUNE_POWER).contains(&power) {
            return Err(CarValidationError::EngineTunePowerOutOfRange {
                power,
                max: MAX_ENGINE_TUNE_POWER,
            });
        }
        Ok(Self(power))
    }

    /// Raw bonus value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for EngineTunePower {
    type Error = CarValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EngineTunePower> for f64 {
    fn from(value: EngineTunePower) -> Self {
        value.0
    }
}

/// Installed audio system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subwoofer {
    pub level: SubwooferLevel,
    pub power_watts: u32,
    pub brand: String,
    pub music_genre: String,
}

impl Default for Subwoofer {
    fn default() -> Self {
        Self {
            level: SubwooferLevel::default(),
            power_watts: 0,
            brand: "none".to_owned(),
            music_genre: "none".to_owned(),
        }
    }
}

/// Everything about a car that upgrades and tuning mutate.
///
/// `Default` is the starter car handed out on first contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarSetup {
    pub name: String,
    pub engine_level: u8,
    pub engine_power_multiplier: f64,
    pub turbo_level: TurboLevel,
    pub suspension_level: SuspensionLevel,
    pub handling_bonus: f64,
    /// `Some` once the valves have been tuned successfully.
    pub valves: Option<ValveQuality>,
    /// `Some` once the engine has been calibrated.
    pub engine_tune: Option<EngineTunePower>,
    pub wiring_quality: u8,
    pub reliability_bonus: f64,
    pub subwoofer: Subwoofer,
    pub body_kit: String,
    pub tint_level: u8,
    pub color: String,
    /// Tracked but not consumed by any formula.
    pub condition: f64,
    /// Tracked but not consumed by any formula.
    pub mileage: i64,
}

impl Default for CarSetup {
    fn default() -> Self {
        Self {
            name: "Street Racer".to_owned(),
            engine_level: 1,
            engine_power_multiplier: 1.0,
            turbo_level: TurboLevel::default(),
            suspension_level: SuspensionLevel::default(),
            handling_bonus: 1.0,
            valves: None,
            engine_tune: None,
            wiring_quality: 0,
            reliability_bonus: 1.0,
            subwoofer: Subwoofer::default(),
            body_kit: "stock".to_owned(),
            tint_level: 0,
            color: "#FF0000".to_owned(),
            condition: 100.0,
            mileage: 0,
        }
    }
}

impl CarSetup {
    /// Snapshot of the fields the performance calculator reads.
    #[must_use]
    pub fn upgrade_state(&self) -> UpgradeState {
        UpgradeState {
            engine_power_multiplier: self.engine_power_multiplier,
            turbo_level: self.turbo_level,
            valves: self.valves,
            engine_tune: self.engine_tune,
            suspension_level: self.suspension_level,
            handling_bonus: self.handling_bonus,
        }
    }

    /// Derived statistics for the current setup.
    #[must_use]
    pub fn performance(&self) -> Performance {
        self.upgrade_state().performance()
    }
}

/// A car owned by exactly one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub owner_id: PlayerId,
    pub setup: CarSetup,
}

impl Car {
    /// Derived statistics for the car.
    #[must_use]
    pub fn performance(&self) -> Performance {
        self.setup.performance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, 0.15)]
    #[case(2, 0.30)]
    #[case(3, 0.50)]
    fn turbo_boost_ratios(#[case] level: u8, #[case] expected: f64) {
        let turbo = TurboLevel::new(level).expect("valid level");
        assert!((turbo.boost_ratio() - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    fn turbo_rejects_level_above_three() {
        assert_eq!(
            TurboLevel::new(4),
            Err(CarValidationError::TurboLevelOutOfRange { level: 4, max: 3 })
        );
    }

    #[rstest]
    #[case(0, 0.0, 1.0)]
    #[case(1, 1.5, 1.2)]
    #[case(2, 3.0, 1.4)]
    #[case(3, 5.0, 1.7)]
    fn suspension_gain_and_bonus(#[case] level: u8, #[case] gain: f64, #[case] bonus: f64) {
        let suspension = SuspensionLevel::new(level).expect("valid level");
        assert!((suspension.handling_gain() - gain).abs() < f64::EPSILON);
        assert!((suspension.handling_bonus() - bonus).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.01)]
    #[case(f64::NAN)]
    fn valve_quality_rejects_out_of_range(#[case] quality: f64) {
        assert!(ValveQuality::new(quality).is_err());
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.25)]
    fn engine_tune_accepts_bounds(#[case] power: f64) {
        assert!(EngineTunePower::new(power).is_ok());
    }

    #[rstest]
    fn engine_tune_rejects_above_cap() {
        assert!(EngineTunePower::new(0.26).is_err());
    }

    #[rstest]
    fn deserialising_rejects_invalid_turbo() {
        let result: Result<TurboLevel, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[rstest]
    fn starter_setup_is_stock() {
        let setup = CarSetup::default();
        assert_eq!(setup.engine_level, 1);
        assert_eq!(setup.turbo_level.get(), 0);
        assert!(setup.valves.is_none());
        assert!(setup.engine_tune.is_none());
        assert!((setup.handling_bonus - 1.0).abs() < f64::EPSILON);
    }
}
