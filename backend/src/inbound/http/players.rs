//! Player profile handler feeding the garage WebApp.
//!
//! ```text
//! GET /api/user/{tg_id}
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Car, Inventory, Performance, PlayerProfile, TelegramId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Derived car statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PerformanceBody {
    #[schema(example = 130.0)]
    pub power: f64,
    #[schema(example = 5.0)]
    pub handling: f64,
    /// Seconds to 100 km/h.
    #[schema(example = 9.35)]
    pub acceleration: f64,
    #[schema(example = 193.33)]
    pub top_speed: f64,
}

impl From<Performance> for PerformanceBody {
    fn from(value: Performance) -> Self {
        Self {
            power: value.power,
            handling: value.handling,
            acceleration: value.acceleration,
            top_speed: value.top_speed,
        }
    }
}

/// The player's active car as the WebApp renders it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CarBody {
    pub id: i64,
    pub name: String,
    pub engine_level: u8,
    pub engine_power: f64,
    pub turbo_level: u8,
    pub suspension_level: u8,
    pub valves_tuned: bool,
    pub valves_quality: f64,
    pub engine_tuned: bool,
    pub engine_tune_power: f64,
    pub wiring_quality: u8,
    pub subwoofer_level: u8,
    pub subwoofer_brand: String,
    pub music_genre: String,
    pub body_kit: String,
    pub tint_level: u8,
    pub color: String,
    pub condition: f64,
    pub mileage: i64,
    pub performance: PerformanceBody,
}

impl From<Car> for CarBody {
    fn from(car: Car) -> Self {
        let performance = car.performance().into();
        let setup = car.setup;
        Self {
            id: car.id.get(),
            name: setup.name,
            engine_level: setup.engine_level,
            engine_power: setup.engine_power_multiplier,
            turbo_level: setup.turbo_level.get(),
            suspension_level: setup.suspension_level.get(),
            valves_tuned: setup.valves.is_some(),
            valves_quality: setup.valves.map_or(0.0, |quality| quality.get()),
            engine_tuned: setup.engine_tune.is_some(),
            engine_tune_power: setup.engine_tune.map_or(0.0, |power| power.get()),
            wiring_quality: setup.wiring_quality,
            subwoofer_level: setup.subwoofer.level.get(),
            subwoofer_brand: setup.subwoofer.brand,
            music_genre: setup.subwoofer.music_genre,
            body_kit: setup.body_kit,
            tint_level: setup.tint_level,
            color: setup.color,
            condition: setup.condition,
            mileage: setup.mileage,
            performance,
        }
    }
}

/// Player profile response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerBody {
    pub id: i64,
    pub tg_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub balance_cash: f64,
    pub balance_token: f64,
    pub total_earned_tokens: f64,
    pub garage_level: u32,
    pub garage_slots: u32,
    pub reputation: i32,
    pub races_won: u32,
    pub races_lost: u32,
    pub fights_won: u32,
    pub fights_lost: u32,
    #[schema(value_type = Object)]
    pub inventory: Inventory,
    pub car: Option<CarBody>,
}

impl From<PlayerProfile> for PlayerBody {
    fn from(profile: PlayerProfile) -> Self {
        let PlayerProfile { player, car } = profile;
        Self {
            id: player.id.get(),
            tg_id: player.telegram_id.get(),
            username: player.username,
            first_name: player.first_name,
            balance_cash: player.wallet.cash,
            balance_token: player.wallet.tokens,
            total_earned_tokens: player.wallet.total_earned_tokens,
            garage_level: player.garage.level,
            garage_slots: player.garage.slots,
            reputation: player.stats.reputation,
            races_won: player.stats.races_won,
            races_lost: player.stats.races_lost,
            fights_won: player.stats.fights_won,
            fights_lost: player.stats.fights_lost,
            inventory: player.inventory,
            car: car.map(CarBody::from),
        }
    }
}

/// Fetch a player's balances, stats, inventory and car.
#[utoipa::path(
    get,
    path = "/api/user/{tg_id}",
    params(("tg_id" = i64, Path, description = "Telegram user id")),
    responses(
        (status = 200, description = "Player profile", body = PlayerBody),
        (status = 404, description = "Player not registered", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["players"],
    operation_id = "getPlayer"
)]
#[get("/user/{tg_id}")]
pub async fn get_player(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PlayerBody>> {
    let telegram_id = TelegramId::new(path.into_inner());
    let profile = state.garage_query.profile(telegram_id).await?;
    Ok(web::Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::eq;
    use serde_json::Value;

    use super::*;
    use crate::domain::Error;
    use crate::inbound::http::test_utils::MockPorts;
    use crate::test_support::sample_profile;

    #[actix_web::test]
    async fn returns_profile_with_car_and_performance() {
        let mut ports = MockPorts::default();
        ports
            .garage_query
            .expect_profile()
            .with(eq(TelegramId::new(42)))
            .times(1)
            .return_once(|_| Ok(sample_profile(1, 42)));
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_data())
                .service(web::scope("/api").service(get_player)),
        )
        .await;

        let body: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get().uri("/api/user/42").to_request(),
        )
        .await;

        assert_eq!(body.get("tg_id").and_then(Value::as_i64), Some(42));
        assert_eq!(body.get("balance_cash").and_then(Value::as_f64), Some(5000.0));
        assert_eq!(
            body.pointer("/car/performance/power").and_then(Value::as_f64),
            Some(100.0)
        );
        assert_eq!(
            body.pointer("/car/valves_tuned").and_then(Value::as_bool),
            Some(false)
        );
        assert!(body.pointer("/inventory/engines").is_some());
    }

    #[actix_web::test]
    async fn unknown_player_maps_to_not_found() {
        let mut ports = MockPorts::default();
        ports
            .garage_query
            .expect_profile()
            .return_once(|_| Err(Error::not_found("player not found")));
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_data())
                .service(web::scope("/api").service(get_player)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/user/7").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
    }
}
