//! Handler coverage for the marketplace endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use mockall::predicate::eq;
use serde_json::{Value, json};

use super::*;
use crate::domain::{Error, ItemKind, Wallet};
use crate::inbound::http::test_utils::MockPorts;
use crate::test_support::sample_listing;

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(ports.into_data()).service(
        web::scope("/api")
            .service(list_listings)
            .service(get_listing)
            .service(create_listing)
            .service(buy_listing),
    )
}

#[actix_web::test]
async fn lists_open_listings_with_default_page() {
    let mut ports = MockPorts::default();
    ports
        .marketplace_query
        .expect_open_listings()
        .with(eq(DEFAULT_PAGE_SIZE))
        .return_once(|_| {
            Ok(vec![
                sample_listing(2, 1, ItemKind::Turbo, 900.0),
                sample_listing(1, 1, ItemKind::Car, 4000.0),
            ])
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let body: Vec<ListingBody> = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/avito/listings")
            .to_request(),
    )
    .await;

    assert_eq!(body.len(), 2);
    assert_eq!(body.first().map(|l| l.item_type.as_str()), Some("turbo"));
}

#[actix_web::test]
async fn caps_requested_page_size() {
    let mut ports = MockPorts::default();
    ports
        .marketplace_query
        .expect_open_listings()
        .with(eq(MAX_LISTING_PAGE))
        .return_once(|_| Ok(Vec::new()));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/avito/listings?limit=5000")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn creates_listing_for_seller() {
    let mut ports = MockPorts::default();
    ports
        .marketplace
        .expect_create_listing()
        .withf(|request| {
            request.seller == TelegramId::new(11)
                && request.item_kind == ItemKind::Subwoofer
                && request.price == 1200.0
        })
        .return_once(|_| Ok(sample_listing(3, 1, ItemKind::Subwoofer, 1200.0)));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/avito/listings/11")
            .set_json(json!({
                "item_type": "subwoofer",
                "item_data": { "level": 2 },
                "price": 1200.0,
                "description": "loud"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: ListingBody = actix_test::read_body_json(response).await;
    assert_eq!(body.id, 3);
    assert!(!body.is_sold);
}

#[actix_web::test]
async fn rejects_unknown_item_type_before_service() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/avito/listings/11")
            .set_json(json!({ "item_type": "spoiler", "price": 10.0 }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some("unknown_item_kind")
    );
}

#[actix_web::test]
async fn purchase_returns_sold_listing_and_buyer_balance() {
    let mut ports = MockPorts::default();
    ports
        .marketplace
        .expect_buy()
        .with(eq(TelegramId::new(20)), eq(ListingId::new(4)))
        .return_once(|_, _| {
            let mut listing = sample_listing(4, 1, ItemKind::Engine, 150.0);
            listing.is_sold = true;
            Ok(PurchaseReceipt {
                listing,
                wallet: Wallet {
                    cash: 850.0,
                    ..Wallet::default()
                },
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let body: PurchaseResponse = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/avito/buy/20/4")
            .to_request(),
    )
    .await;

    assert!(body.listing.is_sold);
    assert_eq!(body.balance_cash, 850.0);
    assert_eq!(body.message, "Bought engine for 150 $");
}

#[actix_web::test]
async fn sold_listing_maps_to_conflict() {
    let mut ports = MockPorts::default();
    ports
        .marketplace
        .expect_buy()
        .return_once(|_, _| Err(Error::conflict("listing 4 is already sold")));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/avito/buy/20/4")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
