//! End-to-end flows through the public HTTP surface.
//!
//! Real handlers, services, and the Telegram webhook run against the
//! in-memory repositories from `test_support`, so no PostgreSQL is needed.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use gunter_backend::Trace;
use gunter_backend::domain::ports::{ChatId, PlayerPersistenceError, PlayerRepository};
use gunter_backend::domain::{
    GarageService, MarketplaceService, NOISE_MAX, NOISE_MIN, RaceNoise, RaceService, TelegramId,
};
use gunter_backend::inbound::http::api_scope;
use gunter_backend::inbound::http::state::{HttpState, HttpStatePorts};
use gunter_backend::inbound::telegram::{BotDispatcher, BotPorts, webhook};
use gunter_backend::test_support::{
    FixedDice, InMemoryStore, RecordingMessenger, SentMessage, sample_profile,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const SELLER: i64 = 100;
const BUYER: i64 = 200;

struct World {
    store: InMemoryStore,
    messenger: RecordingMessenger,
}

#[fixture]
fn world() -> World {
    World {
        store: InMemoryStore::new(),
        messenger: RecordingMessenger::new(),
    }
}

fn test_app(
    world: &World,
    noise: RaceNoise,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let players = Arc::new(world.store.players());
    let dice = Arc::new(FixedDice { unit: 0.0, noise });
    let garage = Arc::new(GarageService::new(
        players.clone(),
        dice.clone(),
        Some(TelegramId::new(SELLER)),
    ));
    let marketplace = Arc::new(MarketplaceService::new(
        players.clone(),
        Arc::new(world.store.listings()),
    ));
    let dispatcher = BotDispatcher::new(
        BotPorts {
            garage_query: garage.clone(),
            garage: garage.clone(),
            messenger: Arc::new(world.messenger.clone()),
        },
        "https://gunter.example",
    );
    let state = HttpState::new(HttpStatePorts {
        garage_query: garage.clone(),
        garage,
        races: Arc::new(RaceService::new(players, dice)),
        marketplace: marketplace.clone(),
        marketplace_query: marketplace,
    });
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(dispatcher))
        .wrap(Trace)
        .service(api_scope())
        .service(webhook)
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().expect("numeric field");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn start_update(telegram_id: i64) -> Value {
    json!({
        "update_id": telegram_id,
        "message": {
            "message_id": 1,
            "from": { "id": telegram_id, "username": format!("racer{telegram_id}") },
            "chat": { "id": telegram_id },
            "text": "/start"
        }
    })
}

#[rstest]
#[actix_web::test]
async fn start_then_profile_shows_the_starter_car(world: World) {
    let app = actix_test::init_service(test_app(&world, RaceNoise::neutral())).await;

    let ack: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/webhook")
            .set_json(start_update(BUYER))
            .to_request(),
    )
    .await;
    assert_eq!(ack, json!({ "ok": true }));
    assert!(matches!(
        world.messenger.messages().await.as_slice(),
        [SentMessage::Sent { chat: ChatId(BUYER), .. }]
    ));

    let player: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/user/{BUYER}"))
            .to_request(),
    )
    .await;
    assert_eq!(player["tg_id"], json!(BUYER));
    assert_close(&player["balance_cash"], 5000.0);
    assert_close(&player["car"]["performance"]["power"], 100.0);
}

#[rstest]
#[actix_web::test]
async fn turbo_upgrade_then_race_loss_is_recorded(world: World) {
    world.store.insert_profile(sample_profile(1, BUYER)).await;
    let app = actix_test::init_service(test_app(&world, RaceNoise::neutral())).await;

    let upgrade: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/upgrade/turbo/{BUYER}?level=1"))
            .to_request(),
    )
    .await;
    assert_close(&upgrade["balance_cash"], 3500.0);
    assert_close(&upgrade["performance"]["power"], 115.0);

    let race: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/race/bot/{BUYER}"))
            .to_request(),
    )
    .await;
    assert_eq!(race["is_winner"], json!(false));
    assert_close(&race["balance_cash"], 3400.0);

    let races = world.store.races().await;
    assert_eq!(races.len(), 1);
    assert!(races.first().is_some_and(|record| record.winner_id.is_none()));
    let profile = world
        .store
        .profile(TelegramId::new(BUYER))
        .await
        .expect("player stored");
    assert_eq!(profile.player.stats.races_lost, 1);
}

#[rstest]
#[actix_web::test]
async fn tuned_car_wins_tokens(world: World) {
    let mut profile = sample_profile(1, BUYER);
    if let Some(car) = profile.car.as_mut() {
        car.setup.engine_power_multiplier = 6.0;
    }
    world.store.insert_profile(profile).await;
    let noise = RaceNoise::new(NOISE_MIN, NOISE_MAX).expect("valid noise");
    let app = actix_test::init_service(test_app(&world, noise)).await;

    let race: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/race/bot/{BUYER}"))
            .to_request(),
    )
    .await;

    assert_eq!(race["is_winner"], json!(true));
    assert_close(&race["balance_cash"], 5500.0);
    assert_close(&race["balance_token"], 5.0);
}

#[rstest]
#[actix_web::test]
async fn car_sale_moves_cash_and_rewards_seller(world: World) {
    world.store.insert_profile(sample_profile(1, SELLER)).await;
    world.store.insert_profile(sample_profile(2, BUYER)).await;
    let app = actix_test::init_service(test_app(&world, RaceNoise::neutral())).await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/avito/listings/{SELLER}"))
            .set_json(json!({
                "item_type": "car",
                "item_data": { "name": "Lada 2107" },
                "price": 1200.0,
                "description": "daily driver"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let listing: Value = actix_test::read_body_json(created).await;
    let listing_id = listing["id"].as_i64().expect("listing id");

    let purchase: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/avito/buy/{BUYER}/{listing_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(purchase["success"], json!(true));
    assert_close(&purchase["balance_cash"], 3800.0);

    let seller = world
        .store
        .profile(TelegramId::new(SELLER))
        .await
        .expect("seller stored");
    assert!((seller.player.wallet.cash - 6200.0).abs() < 1e-9);
    assert!((seller.player.wallet.tokens - 10.0).abs() < 1e-9);
    let buyer = world
        .store
        .profile(TelegramId::new(BUYER))
        .await
        .expect("buyer stored");
    assert_eq!(buyer.player.inventory.len(), 1);

    let again = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/avito/buy/{BUYER}/{listing_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn purchase_beyond_budget_leaves_balances_untouched(world: World) {
    world.store.insert_profile(sample_profile(1, SELLER)).await;
    let mut buyer = sample_profile(2, BUYER);
    buyer.player.wallet.cash = 100.0;
    world.store.insert_profile(buyer).await;
    let app = actix_test::init_service(test_app(&world, RaceNoise::neutral())).await;

    let created: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/avito/listings/{SELLER}"))
            .set_json(json!({ "item_type": "turbo", "price": 150.0 }))
            .to_request(),
    )
    .await;
    let listing_id = created["id"].as_i64().expect("listing id");

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/avito/buy/{BUYER}/{listing_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let trace_header = response
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], json!("insufficient_funds"));
    assert_eq!(body["traceId"], json!(trace_header));

    let buyer = world
        .store
        .profile(TelegramId::new(BUYER))
        .await
        .expect("buyer stored");
    assert!((buyer.player.wallet.cash - 100.0).abs() < 1e-9);
    let listing: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/avito/listings/{listing_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(listing["is_sold"], json!(false));
}

#[rstest]
#[actix_web::test]
async fn stale_profile_save_cannot_erase_sale_proceeds(world: World) {
    world.store.insert_profile(sample_profile(1, SELLER)).await;
    world.store.insert_profile(sample_profile(2, BUYER)).await;
    let app = actix_test::init_service(test_app(&world, RaceNoise::neutral())).await;
    let players = world.store.players();

    let created: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/avito/listings/{SELLER}"))
            .set_json(json!({ "item_type": "car", "price": 1200.0 }))
            .to_request(),
    )
    .await;
    let listing_id = created["id"].as_i64().expect("listing id");

    // The seller's race loads the profile before the sale settles.
    let mut in_flight = players
        .find_by_telegram_id(TelegramId::new(SELLER))
        .await
        .expect("lookup")
        .expect("seller stored");

    let purchase = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/avito/buy/{BUYER}/{listing_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(purchase.status(), StatusCode::OK);

    in_flight.player.wallet.cash -= 100.0;
    let error = players.save(&in_flight).await.expect_err("stale copy rejected");
    assert!(matches!(error, PlayerPersistenceError::Stale { .. }));

    let seller = world
        .store
        .profile(TelegramId::new(SELLER))
        .await
        .expect("seller stored");
    assert!((seller.player.wallet.cash - 6200.0).abs() < 1e-9);
    assert!((seller.player.wallet.tokens - 10.0).abs() < 1e-9);
}
