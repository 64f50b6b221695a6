//! Driving port for browsing the marketplace.

use async_trait::async_trait;

use crate::domain::{Error, Listing, ListingId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceQuery: Send + Sync {
    /// Unsold listings, newest first.
    async fn open_listings(&self, limit: u32) -> Result<Vec<Listing>, Error>;

    async fn listing(&self, id: ListingId) -> Result<Listing, Error>;
}
