//! Part upgrades and tuning applied to a [`CarSetup`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::car::{
    CarSetup, CarValidationError, EngineTunePower, MAX_ENGINE_TUNE_POWER, SubwooferLevel,
    SuspensionLevel, TurboLevel, ValveQuality,
};
use super::pricing::{ENGINE_TUNE_MIN_POWER, UpgradePart};

/// Longest accepted subwoofer brand or music genre.
pub const LABEL_MAX: usize = 32;

/// Reasons an upgrade request is rejected before any money moves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpgradeError {
    #[error("{part} level must be between 1 and 3, got {level}")]
    LevelOutOfRange { part: &'static str, level: u8 },
    #[error("{part} level {installed} is already installed; choose a higher level")]
    NotAnUpgrade {
        part: &'static str,
        installed: u8,
        requested: u8,
    },
    #[error("{field} must be between 1 and {LABEL_MAX} characters")]
    InvalidLabel { field: &'static str },
}

/// A requested part installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part", rename_all = "snake_case")]
pub enum PartUpgrade {
    Turbo {
        level: TurboLevel,
    },
    Suspension {
        level: SuspensionLevel,
    },
    Subwoofer {
        level: SubwooferLevel,
        brand: String,
        music_genre: String,
    },
}

fn purchasable<T>(
    part: UpgradePart,
    level: u8,
    build: impl FnOnce(u8) -> Result<T, CarValidationError>,
) -> Result<T, UpgradeError> {
    let out_of_range = || UpgradeError::LevelOutOfRange {
        part: part.as_str(),
        level,
    };
    if level == 0 {
        return Err(out_of_range());
    }
    build(level).map_err(|_| out_of_range())
}

fn label(field: &'static str, value: &str) -> Result<String, UpgradeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > LABEL_MAX {
        return Err(UpgradeError::InvalidLabel { field });
    }
    Ok(trimmed.to_owned())
}

impl PartUpgrade {
    pub fn turbo(level: u8) -> Result<Self, UpgradeError> {
        let level = purchasable(UpgradePart::Turbo, level, TurboLevel::new)?;
        Ok(Self::Turbo { level })
    }

    pub fn suspension(level: u8) -> Result<Self, UpgradeError> {
        let level = purchasable(UpgradePart::Suspension, level, SuspensionLevel::new)?;
        Ok(Self::Suspension { level })
    }

    /// Validate a subwoofer request; brand and genre are trimmed.
    pub fn subwoofer(level: u8, brand: &str, music_genre: &str) -> Result<Self, UpgradeError> {
        let level = purchasable(UpgradePart::Subwoofer, level, SubwooferLevel::new)?;
        Ok(Self::Subwoofer {
            level,
            brand: label("brand", brand)?,
            music_genre: label("genre", music_genre)?,
        })
    }

    #[must_use]
    pub const fn part(&self) -> UpgradePart {
        match self {
            Self::Turbo { .. } => UpgradePart::Turbo,
            Self::Suspension { .. } => UpgradePart::Suspension,
            Self::Subwoofer { .. } => UpgradePart::Subwoofer,
        }
    }

    /// Requested level as a raw number.
    #[must_use]
    pub const fn level(&self) -> u8 {
        match self {
            Self::Turbo { level } => level.get(),
            Self::Suspension { level } => level.get(),
            Self::Subwoofer { level, .. } => level.get(),
        }
    }

    /// Purchase price of the requested level.
    #[must_use]
    pub fn price(&self) -> f64 {
        // Levels are validated to 1..=3 on construction.
        self.part().price(self.level()).unwrap_or(f64::INFINITY)
    }

    /// Reject requests that do not raise the installed level.
    pub fn ensure_upgrade_of(&self, setup: &CarSetup) -> Result<(), UpgradeError> {
        let installed = match self {
            Self::Turbo { .. } => setup.turbo_level.get(),
            Self::Suspension { .. } => setup.suspension_level.get(),
            Self::Subwoofer { .. } => setup.subwoofer.level.get(),
        };
        let requested = self.level();
        if requested <= installed {
            return Err(UpgradeError::NotAnUpgrade {
                part: self.part().as_str(),
                installed,
                requested,
            });
        }
        Ok(())
    }

    /// Install the part on `setup`.
    pub fn apply(self, setup: &mut CarSetup) {
        match self {
            Self::Turbo { level } => setup.turbo_level = level,
            Self::Suspension { level } => {
                setup.suspension_level = level;
                setup.handling_bonus = level.handling_bonus();
            }
            Self::Subwoofer {
                level,
                brand,
                music_genre,
            } => {
                setup.subwoofer.level = level;
                setup.subwoofer.power_watts = level.power_watts();
                setup.subwoofer.brand = brand;
                setup.subwoofer.music_genre = music_genre;
            }
        }
    }
}

/// Record a successful valve tune, keeping the better of the old and new
/// quality. `unit` is a uniform sample in `[0, 1)`.
pub fn apply_valve_tune(setup: &mut CarSetup, unit: f64) -> ValveQuality {
    let rolled = ValveQuality::new(unit.clamp(0.0, 1.0)).unwrap_or_default();
    let kept = match setup.valves {
        Some(current) if current >= rolled => current,
        _ => rolled,
    };
    setup.valves = Some(kept);
    kept
}

/// Record an engine calibration, keeping the better bonus. `unit` is a
/// uniform sample in `[0, 1)` mapped onto `[0.05, 0.25]`.
pub fn apply_engine_tune(setup: &mut CarSetup, unit: f64) -> EngineTunePower {
    let span = MAX_ENGINE_TUNE_POWER - ENGINE_TUNE_MIN_POWER;
    let raw = ENGINE_TUNE_MIN_POWER + unit.clamp(0.0, 1.0) * span;
    let rolled = EngineTunePower::new(raw.min(MAX_ENGINE_TUNE_POWER)).unwrap_or_default();
    let kept = match setup.engine_tune {
        Some(current) if current >= rolled => current,
        _ => rolled,
    };
    setup.engine_tune = Some(kept);
    kept
}
