//! Port abstraction for marketplace listings.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ItemKind, Listing, ListingId, NewListing, PlayerId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ListingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing repository query failed: {message}",
        /// Another buyer settled the listing first.
        AlreadySold { listing_id: i64 } => "listing {listing_id} is already sold",
        /// The buyer's balance dropped below the price before settlement.
        InsufficientFunds { listing_id: i64 } => "buyer cannot cover listing {listing_id}",
    }
}

/// Everything a purchase changes, applied in one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseSettlement {
    pub listing_id: ListingId,
    pub buyer_id: PlayerId,
    pub seller_id: PlayerId,
    pub price: f64,
    pub item_kind: ItemKind,
    pub item_data: Value,
    /// Extra GTR credited to the seller.
    pub seller_token_bonus: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, listing: &NewListing) -> Result<Listing, ListingPersistenceError>;

    async fn find(&self, id: ListingId) -> Result<Option<Listing>, ListingPersistenceError>;

    /// Unsold listings, newest first.
    async fn list_open(&self, limit: u32) -> Result<Vec<Listing>, ListingPersistenceError>;

    /// Move money, append the item to the buyer's inventory, and flag the
    /// listing sold. Fails with `AlreadySold` if the flag was already set.
    async fn settle_purchase(
        &self,
        settlement: &PurchaseSettlement,
    ) -> Result<(), ListingPersistenceError>;
}
