//! PostgreSQL-backed `ListingRepository` implementation using Diesel ORM.
//!
//! Settlement moves balances with relative updates and bumps both players'
//! `version`, so a profile loaded before the sale can no longer be saved.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{ListingPersistenceError, ListingRepository, PurchaseSettlement};
use crate::domain::{Listing, ListingId, NewListing};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ListingRow, NewListingRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{inventory_from_value, listing_from_row};
use super::schema::{listings, players};

/// Diesel-backed implementation of the `ListingRepository` port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ListingPersistenceError {
    map_pool_error(error, ListingPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ListingPersistenceError {
    map_diesel_error(
        error,
        ListingPersistenceError::query,
        ListingPersistenceError::connection,
    )
}

fn to_listing(row: ListingRow) -> Result<Listing, ListingPersistenceError> {
    listing_from_row(row)
        .map_err(|err| ListingPersistenceError::query(format!("invalid stored listing: {err}")))
}

/// Settlement failures that must roll the transaction back.
#[derive(Debug)]
enum SettleError {
    Diesel(diesel::result::Error),
    AlreadySold,
    InsufficientFunds,
    Inventory(String),
}

impl From<diesel::result::Error> for SettleError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn create(&self, listing: &NewListing) -> Result<Listing, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewListingRow {
            seller_id: listing.seller_id.get(),
            item_type: listing.item_kind.as_str(),
            item_data: &listing.item_data,
            price: listing.price.get(),
            description: &listing.description,
        };
        let created: ListingRow = diesel::insert_into(listings::table)
            .values(&row)
            .returning(ListingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        to_listing(created)
    }

    async fn find(&self, id: ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ListingRow> = listings::table
            .filter(listings::id.eq(id.get()))
            .select(ListingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(to_listing).transpose()
    }

    async fn list_open(&self, limit: u32) -> Result<Vec<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ListingRow> = listings::table
            .filter(listings::is_sold.eq(false))
            .order((listings::created_at.desc(), listings::id.desc()))
            .limit(i64::from(limit))
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_listing).collect()
    }

    async fn settle_purchase(
        &self,
        settlement: &PurchaseSettlement,
    ) -> Result<(), ListingPersistenceError> {
        let listing_id = settlement.listing_id.get();
        let buyer_id = settlement.buyer_id.get();
        let seller_id = settlement.seller_id.get();
        let price = settlement.price;
        let bonus = settlement.seller_token_bonus;
        let item_kind = settlement.item_kind;
        let item_data = settlement.item_data.clone();
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let result = conn
            .transaction(|conn| {
                async move {
                    let marked = diesel::update(
                        listings::table
                            .filter(listings::id.eq(listing_id))
                            .filter(listings::is_sold.eq(false)),
                    )
                    .set(listings::is_sold.eq(true))
                    .execute(conn)
                    .await?;
                    if marked == 0 {
                        return Err(SettleError::AlreadySold);
                    }

                    let debited = diesel::update(
                        players::table
                            .filter(players::id.eq(buyer_id))
                            .filter(players::balance_cash.ge(price)),
                    )
                    .set(players::balance_cash.eq(players::balance_cash - price))
                    .execute(conn)
                    .await?;
                    if debited == 0 {
                        return Err(SettleError::InsufficientFunds);
                    }

                    let stored: serde_json::Value = players::table
                        .filter(players::id.eq(buyer_id))
                        .select(players::inventory)
                        .for_update()
                        .first(conn)
                        .await?;
                    let mut inventory =
                        inventory_from_value(stored).map_err(SettleError::Inventory)?;
                    inventory.push(item_kind, item_data);
                    let inventory = serde_json::to_value(&inventory)
                        .map_err(|err| SettleError::Inventory(err.to_string()))?;
                    diesel::update(players::table.filter(players::id.eq(buyer_id)))
                        .set((
                            players::inventory.eq(inventory),
                            players::version.eq(players::version + 1),
                        ))
                        .execute(conn)
                        .await?;

                    diesel::update(players::table.filter(players::id.eq(seller_id)))
                        .set((
                            players::balance_cash.eq(players::balance_cash + price),
                            players::balance_token.eq(players::balance_token + bonus),
                            players::total_earned_tokens
                                .eq(players::total_earned_tokens + bonus),
                            players::version.eq(players::version + 1),
                        ))
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(()) => {
                debug!(listing_id, buyer_id, seller_id, "purchase settled");
                Ok(())
            }
            Err(SettleError::AlreadySold) => {
                Err(ListingPersistenceError::already_sold(listing_id))
            }
            Err(SettleError::InsufficientFunds) => {
                Err(ListingPersistenceError::insufficient_funds(listing_id))
            }
            Err(SettleError::Inventory(message)) => Err(ListingPersistenceError::query(message)),
            Err(SettleError::Diesel(error)) => Err(diesel_error(error)),
        }
    }
}
