//! Randomness source for tuning rolls and race noise.

use rand::Rng;

use crate::domain::RaceNoise;

/// Uniform randomness consumed by domain services.
#[cfg_attr(test, mockall::automock)]
pub trait Dice: Send + Sync {
    /// Uniform sample in `[0, 1)`.
    fn unit(&self) -> f64;

    /// Independent noise for both sides of a race.
    fn race_noise(&self) -> RaceNoise;
}

/// [`Dice`] backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngDice;

impl Dice for ThreadRngDice {
    fn unit(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }

    fn race_noise(&self) -> RaceNoise {
        RaceNoise::sample_with_rng(&mut rand::thread_rng())
    }
}
