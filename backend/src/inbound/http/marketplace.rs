//! Marketplace ("Avito") handlers.
//!
//! ```text
//! GET  /api/avito/listings?limit=20
//! GET  /api/avito/listings/{id}
//! POST /api/avito/listings/{tg_id} {"item_type":"turbo","item_data":{},"price":900,"description":"..."}
//! POST /api/avito/buy/{tg_id}/{listing_id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateListingRequest, PurchaseReceipt};
use crate::domain::{Listing, ListingId, MAX_LISTING_PAGE, TelegramId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ItemKindSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_item_kind;

const DEFAULT_PAGE_SIZE: u32 = 50;

/// Paging for the open listings feed.
#[derive(Debug, Default, Deserialize)]
pub struct ListingsQuery {
    pub limit: Option<u32>,
}

/// Listing as shown on the marketplace page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingBody {
    pub id: i64,
    pub seller_id: i64,
    #[schema(value_type = ItemKindSchema)]
    pub item_type: String,
    #[schema(value_type = Object)]
    pub item_data: serde_json::Value,
    pub price: f64,
    pub description: String,
    pub is_sold: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Listing> for ListingBody {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.get(),
            seller_id: listing.seller_id.get(),
            item_type: listing.item_kind.as_str().to_owned(),
            item_data: listing.item_data,
            price: listing.price.get(),
            description: listing.description,
            is_sold: listing.is_sold,
            created_at: listing.created_at.to_rfc3339(),
        }
    }
}

/// Request body for `POST /api/avito/listings/{tg_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateListingBody {
    #[schema(value_type = ItemKindSchema)]
    pub item_type: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub item_data: serde_json::Value,
    #[schema(example = 900.0)]
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

/// Response after a successful purchase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub success: bool,
    pub message: String,
    pub listing: ListingBody,
    pub balance_cash: f64,
    pub balance_token: f64,
}

impl From<PurchaseReceipt> for PurchaseResponse {
    fn from(receipt: PurchaseReceipt) -> Self {
        let listing = ListingBody::from(receipt.listing);
        Self {
            success: true,
            message: format!("Bought {} for {:.0} $", listing.item_type, listing.price),
            listing,
            balance_cash: receipt.wallet.cash,
            balance_token: receipt.wallet.tokens,
        }
    }
}

/// Unsold listings, newest first.
#[utoipa::path(
    get,
    path = "/api/avito/listings",
    params(("limit" = Option<u32>, Query, description = "Page size, at most 100")),
    responses(
        (status = 200, description = "Open listings", body = [ListingBody]),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["marketplace"],
    operation_id = "listOpenListings"
)]
#[get("/avito/listings")]
pub async fn list_listings(
    state: web::Data<HttpState>,
    query: web::Query<ListingsQuery>,
) -> ApiResult<web::Json<Vec<ListingBody>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_LISTING_PAGE);
    let listings = state.marketplace_query.open_listings(limit).await?;
    Ok(web::Json(listings.into_iter().map(ListingBody::from).collect()))
}

/// Fetch one listing, sold or not.
#[utoipa::path(
    get,
    path = "/api/avito/listings/{id}",
    params(("id" = i64, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing", body = ListingBody),
        (status = 404, description = "Listing not found", body = ErrorSchema)
    ),
    tags = ["marketplace"],
    operation_id = "getListing"
)]
#[get("/avito/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ListingBody>> {
    let listing = state
        .marketplace_query
        .listing(ListingId::new(path.into_inner()))
        .await?;
    Ok(web::Json(listing.into()))
}

/// Put an item up for sale.
#[utoipa::path(
    post,
    path = "/api/avito/listings/{tg_id}",
    params(("tg_id" = i64, Path, description = "Seller Telegram user id")),
    request_body = CreateListingBody,
    responses(
        (status = 201, description = "Listing created", body = ListingBody),
        (status = 400, description = "Invalid listing", body = ErrorSchema),
        (status = 404, description = "Seller not registered", body = ErrorSchema)
    ),
    tags = ["marketplace"],
    operation_id = "createListing"
)]
#[post("/avito/listings/{tg_id}")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<CreateListingBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = CreateListingRequest {
        seller: TelegramId::new(path.into_inner()),
        item_kind: parse_item_kind(body.item_type.trim())?,
        item_data: body.item_data,
        price: body.price,
        description: body.description,
    };
    let listing = state.marketplace.create_listing(request).await?;
    Ok(HttpResponse::Created().json(ListingBody::from(listing)))
}

/// Buy a listing: cash moves to the seller and the item lands in the buyer's inventory.
#[utoipa::path(
    post,
    path = "/api/avito/buy/{tg_id}/{listing_id}",
    params(
        ("tg_id" = i64, Path, description = "Buyer Telegram user id"),
        ("listing_id" = i64, Path, description = "Listing id")
    ),
    responses(
        (status = 200, description = "Purchase settled", body = PurchaseResponse),
        (status = 400, description = "Buying your own listing", body = ErrorSchema),
        (status = 402, description = "Not enough cash", body = ErrorSchema),
        (status = 404, description = "Listing or buyer not found", body = ErrorSchema),
        (status = 409, description = "Listing already sold", body = ErrorSchema)
    ),
    tags = ["marketplace"],
    operation_id = "buyListing"
)]
#[post("/avito/buy/{tg_id}/{listing_id}")]
pub async fn buy_listing(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<web::Json<PurchaseResponse>> {
    let (buyer, listing_id) = path.into_inner();
    let receipt = state
        .marketplace
        .buy(TelegramId::new(buyer), ListingId::new(listing_id))
        .await?;
    Ok(web::Json(receipt.into()))
}

#[cfg(test)]
#[path = "marketplace_tests.rs"]
mod tests;
