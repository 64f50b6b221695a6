//! Marketplace domain service: listing creation, browsing, and purchases.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateListingRequest, GameMetrics, ListingPersistenceError, ListingRepository,
    MarketplaceCommand, MarketplaceQuery, NoOpGameMetrics, PlayerRepository, PurchaseReceipt,
    PurchaseSettlement,
};
use crate::domain::{
    CAR_SALE_TOKEN_BONUS, Error, ItemKind, Listing, ListingId, NewListing, Price, TelegramId,
};

use super::garage_service::{insufficient_funds, load_profile};

/// Largest page of open listings served at once.
pub const MAX_LISTING_PAGE: u32 = 100;

fn map_listing_error(error: ListingPersistenceError) -> Error {
    match error {
        ListingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("listing repository unavailable: {message}"))
        }
        ListingPersistenceError::Query { message } => {
            Error::internal(format!("listing repository error: {message}"))
        }
        ListingPersistenceError::AlreadySold { listing_id } => {
            Error::conflict(format!("listing {listing_id} is already sold"))
                .with_details(json!({ "listingId": listing_id }))
        }
        ListingPersistenceError::InsufficientFunds { listing_id } => Error::insufficient_funds(
            format!("balance no longer covers listing {listing_id}"),
        )
        .with_details(json!({ "listingId": listing_id })),
    }
}

/// Marketplace service implementing [`MarketplaceCommand`] and
/// [`MarketplaceQuery`].
#[derive(Clone)]
pub struct MarketplaceService<P, L, M: ?Sized = NoOpGameMetrics> {
    players: Arc<P>,
    listings: Arc<L>,
    metrics: Arc<M>,
}

impl<P, L> MarketplaceService<P, L> {
    pub fn new(players: Arc<P>, listings: Arc<L>) -> Self {
        Self::with_metrics(players, listings, Arc::new(NoOpGameMetrics))
    }
}

impl<P, L, M: ?Sized> MarketplaceService<P, L, M> {
    /// Count settled sales through `metrics`.
    pub fn with_metrics(players: Arc<P>, listings: Arc<L>, metrics: Arc<M>) -> Self {
        Self {
            players,
            listings,
            metrics,
        }
    }
}

impl<P, L, M> MarketplaceService<P, L, M>
where
    P: PlayerRepository,
    L: ListingRepository,
    M: GameMetrics + ?Sized,
{
    async fn find_listing(&self, id: ListingId) -> Result<Listing, Error> {
        self.listings
            .find(id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| Error::not_found(format!("listing {id} not found")))
    }
}

#[async_trait]
impl<P, L, M> MarketplaceQuery for MarketplaceService<P, L, M>
where
    P: PlayerRepository,
    L: ListingRepository,
    M: GameMetrics + ?Sized,
{
    async fn open_listings(&self, limit: u32) -> Result<Vec<Listing>, Error> {
        self.listings
            .list_open(limit.clamp(1, MAX_LISTING_PAGE))
            .await
            .map_err(map_listing_error)
    }

    async fn listing(&self, id: ListingId) -> Result<Listing, Error> {
        self.find_listing(id).await
    }
}

#[async_trait]
impl<P, L, M> MarketplaceCommand for MarketplaceService<P, L, M>
where
    P: PlayerRepository,
    L: ListingRepository,
    M: GameMetrics + ?Sized,
{
    async fn create_listing(&self, request: CreateListingRequest) -> Result<Listing, Error> {
        let price =
            Price::new(request.price).map_err(|err| Error::invalid_request(err.to_string()))?;
        let seller = load_profile(self.players.as_ref(), request.seller).await?;
        let draft = NewListing::try_new(
            seller.player.id,
            request.item_kind,
            request.item_data,
            price,
            request.description,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let listing = self
            .listings
            .create(&draft)
            .await
            .map_err(map_listing_error)?;
        info!(
            listing_id = listing.id.get(),
            seller_id = listing.seller_id.get(),
            item_kind = listing.item_kind.as_str(),
            price = listing.price.get(),
            "listing created"
        );
        Ok(listing)
    }

    async fn buy(
        &self,
        buyer: TelegramId,
        listing_id: ListingId,
    ) -> Result<PurchaseReceipt, Error> {
        let mut profile = load_profile(self.players.as_ref(), buyer).await?;
        let mut listing = self.find_listing(listing_id).await?;
        if listing.is_sold {
            return Err(map_listing_error(ListingPersistenceError::already_sold(
                listing_id.get(),
            )));
        }
        if listing.seller_id == profile.player.id {
            return Err(Error::invalid_request("you cannot buy your own listing"));
        }
        let price = listing.price.get();
        profile
            .player
            .wallet
            .debit_cash(price)
            .map_err(insufficient_funds)?;

        let settlement = PurchaseSettlement {
            listing_id,
            buyer_id: profile.player.id,
            seller_id: listing.seller_id,
            price,
            item_kind: listing.item_kind,
            item_data: listing.item_data.clone(),
            seller_token_bonus: if listing.item_kind == ItemKind::Car {
                CAR_SALE_TOKEN_BONUS
            } else {
                0.0
            },
        };
        self.listings
            .settle_purchase(&settlement)
            .await
            .map_err(map_listing_error)?;

        listing.is_sold = true;
        info!(
            listing_id = listing_id.get(),
            buyer_id = settlement.buyer_id.get(),
            seller_id = settlement.seller_id.get(),
            price,
            "listing sold"
        );
        if let Err(err) = self.metrics.record_sale(listing.item_kind, price).await {
            warn!(error = %err, "sale metric not recorded");
        }
        Ok(PurchaseReceipt {
            listing,
            wallet: profile.player.wallet,
        })
    }
}
