//! Marketplace ("Avito") listings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::player::PlayerId;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 280;
/// Tokens credited to the seller when a car changes hands.
pub const CAR_SALE_TOKEN_BONUS: f64 = 10.0;

/// Validation errors for listing input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListingValidationError {
    #[error("price must be a positive amount, got {price}")]
    InvalidPrice { price: f64 },
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("unknown item type: {value}")]
    UnknownItemKind { value: String },
}

/// Database identifier of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(i64);

impl ListingId {
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

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of item offered on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Car,
    Engine,
    Turbo,
    Suspension,
    Subwoofer,
    BodyKit,
    Other,
}

impl ItemKind {
    /// Every kind, in inventory order.
    pub const ALL: [Self; 7] = [
        Self::Engine,
        Self::Turbo,
        Self::Suspension,
        Self::Subwoofer,
        Self::BodyKit,
        Self::Car,
        Self::Other,
    ];

    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Engine => "engine",
            Self::Turbo => "turbo",
            Self::Suspension => "suspension",
            Self::Subwoofer => "subwoofer",
            Self::BodyKit => "body_kit",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ListingValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| ListingValidationError::UnknownItemKind {
                value: value.to_owned(),
            })
    }
}

/// Positive, finite asking price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Validate a raw price.
    pub fn new(price: f64) -> Result<Self, ListingValidationError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(ListingValidationError::InvalidPrice { price });
        }
        Ok(Self(price))
    }

    /// Raw amount.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = ListingValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Validated listing input, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub seller_id: PlayerId,
    pub item_kind: ItemKind,
    pub item_data: Value,
    pub price: Price,
    pub description: String,
}

impl NewListing {
    /// Validate the description and assemble the listing.
    pub fn try_new(
        seller_id: PlayerId,
        item_kind: ItemKind,
        item_data: Value,
        price: Price,
        description: impl Into<String>,
    ) -> Result<Self, ListingValidationError> {
        let description = description.into().trim().to_owned();
        if description.chars().count() > DESCRIPTION_MAX {
            return Err(ListingValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(Self {
            seller_id,
            item_kind,
            item_data,
            price,
            description,
        })
    }
}

/// A persisted listing. Transitions unsold → sold exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub seller_id: PlayerId,
    pub item_kind: ItemKind,
    pub item_data: Value,
    pub price: Price,
    pub description: String,
    pub is_sold: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn price_rejects_non_positive_or_non_finite(#[case] raw: f64) {
        assert!(Price::new(raw).is_err());
    }

    #[rstest]
    fn item_kind_round_trips_storage_names() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.as_str().parse::<ItemKind>(), Ok(kind));
        }
    }

    #[rstest]
    fn item_kind_rejects_unknown_values() {
        assert!("spaceship".parse::<ItemKind>().is_err());
    }

    #[rstest]
    fn new_listing_trims_and_bounds_description() {
        let price = Price::new(150.0).expect("valid price");
        let listing = NewListing::try_new(
            PlayerId::new(1),
            ItemKind::Turbo,
            json!({ "level": 2 }),
            price,
            "  barely used  ",
        )
        .expect("valid listing");
        assert_eq!(listing.description, "barely used");

        let too_long = "x".repeat(DESCRIPTION_MAX + 1);
        let result = NewListing::try_new(
            PlayerId::new(1),
            ItemKind::Turbo,
            json!({}),
            price,
            too_long,
        );
        assert_eq!(
            result,
            Err(ListingValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX
            })
        );
    }
}
