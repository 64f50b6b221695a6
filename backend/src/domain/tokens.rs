//! GTR token packages and airdrop snapshots.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::player::TelegramId;

/// Purchasable token package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationPackage {
    Small,
    Medium,
    Large,
}

impl DonationPackage {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Look up the package bought with `amount`.
    #[must_use]
    pub const fn from_amount(amount: u32) -> Option<Self> {
        match amount {
            100 => Some(Self::Small),
            500 => Some(Self::Medium),
            1000 => Some(Self::Large),
            _ => None,
        }
    }

    /// Amount paid.
    #[must_use]
    pub const fn amount(self) -> u32 {
        match self {
            Self::Small => 100,
            Self::Medium => 500,
            Self::Large => 1000,
        }
    }

    /// Tokens credited, including the volume bonus.
    #[must_use]
    pub const fn tokens(self) -> f64 {
        match self {
            Self::Small => 100.0,
            Self::Medium => 550.0,
            Self::Large => 1200.0,
        }
    }
}

/// One row of an airdrop snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub telegram_id: TelegramId,
    pub balance: f64,
}

/// Token balances of every player at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub holdings: Vec<TokenHolding>,
}

impl TokenSnapshot {
    #[must_use]
    pub fn new(holdings: Vec<TokenHolding>) -> Self {
        Self { holdings }
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.holdings.iter().map(|h| h.balance).sum()
    }

    /// Render as `tg_id,balance_token` CSV with a header row.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::from("tg_id,balance_token\n");
        for holding in &self.holdings {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{},{}", holding.telegram_id, holding.balance);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, 100.0)]
    #[case(500, 550.0)]
    #[case(1000, 1200.0)]
    fn packages_credit_bonus_tokens(#[case] amount: u32, #[case] tokens: f64) {
        let package = DonationPackage::from_amount(amount).expect("known package");
        assert_eq!(package.amount(), amount);
        assert!((package.tokens() - tokens).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(0)]
    #[case(250)]
    #[case(5000)]
    fn unknown_amounts_have_no_package(#[case] amount: u32) {
        assert_eq!(DonationPackage::from_amount(amount), None);
    }

    #[rstest]
    fn snapshot_renders_csv() {
        let snapshot = TokenSnapshot::new(vec![
            TokenHolding {
                telegram_id: TelegramId::new(42),
                balance: 12.5,
            },
            TokenHolding {
                telegram_id: TelegramId::new(7),
                balance: 0.0,
            },
        ]);
        assert_eq!(snapshot.to_csv(), "tg_id,balance_token\n42,12.5\n7,0\n");
        assert!((snapshot.total() - 12.5).abs() < f64::EPSILON);
    }
}
