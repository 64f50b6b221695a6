//! Driving port for marketplace mutations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Error, ItemKind, Listing, ListingId, TelegramId, Wallet};

/// Unvalidated listing input from a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateListingRequest {
    pub seller: TelegramId,
    pub item_kind: ItemKind,
    pub item_data: Value,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub listing: Listing,
    /// Buyer balances after the purchase.
    pub wallet: Wallet,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceCommand: Send + Sync {
    async fn create_listing(&self, request: CreateListingRequest) -> Result<Listing, Error>;

    async fn buy(&self, buyer: TelegramId, listing_id: ListingId)
    -> Result<PurchaseReceipt, Error>;
}
