//! Upgrade and tuning handlers.
//!
//! ```text
//! POST /api/tune/valves/{tg_id}
//! POST /api/tune/engine/{tg_id}
//! POST /api/upgrade/turbo/{tg_id}?level=2
//! POST /api/upgrade/suspension/{tg_id}?level=1
//! POST /api/upgrade/subwoofer/{tg_id}?level=3&brand=Kicker&genre=chanson
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{EngineTuneOutcome, UpgradeReceipt, UpgradeRequest, ValveTuneOutcome};
use crate::domain::{PartUpgrade, TelegramId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::players::PerformanceBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_upgrade_error, parse_level, require};

/// Query string accepted by the turbo and suspension upgrades.
#[derive(Debug, Default, Deserialize)]
pub struct LevelQuery {
    pub level: Option<String>,
}

/// Query string accepted by the subwoofer upgrade.
#[derive(Debug, Default, Deserialize)]
pub struct SubwooferQuery {
    pub level: Option<String>,
    pub brand: Option<String>,
    pub genre: Option<String>,
}

/// Response after a valve tuning attempt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValveTuneResponse {
    pub success: bool,
    pub message: String,
    /// Installed valve quality in `[0, 1]`, absent until a tune succeeds.
    pub quality: Option<f64>,
    pub price: f64,
    pub balance_cash: f64,
    pub performance: PerformanceBody,
}

impl From<ValveTuneOutcome> for ValveTuneResponse {
    fn from(outcome: ValveTuneOutcome) -> Self {
        let quality = outcome.quality.map(|quality| quality.get());
        let message = match (outcome.success, quality) {
            (true, Some(quality)) => format!("Valves tuned, quality {:.0}%", quality * 100.0),
            _ => "The mechanic botched the valves; try again".to_owned(),
        };
        Self {
            success: outcome.success,
            message,
            quality,
            price: outcome.price,
            balance_cash: outcome.wallet.cash,
            performance: outcome.performance.into(),
        }
    }
}

/// Response after an engine calibration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EngineTuneResponse {
    pub success: bool,
    pub message: String,
    /// Extra power fraction now installed.
    pub tune_power: f64,
    pub price: f64,
    pub balance_cash: f64,
    pub performance: PerformanceBody,
}

impl From<EngineTuneOutcome> for EngineTuneResponse {
    fn from(outcome: EngineTuneOutcome) -> Self {
        let tune_power = outcome.tune_power.get();
        Self {
            success: true,
            message: format!("Engine calibrated: +{:.0}% power", tune_power * 100.0),
            tune_power,
            price: outcome.price,
            balance_cash: outcome.wallet.cash,
            performance: outcome.performance.into(),
        }
    }
}

/// Response after a part installation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpgradeResponse {
    pub success: bool,
    pub message: String,
    #[schema(example = "turbo")]
    pub part: String,
    pub level: u8,
    pub price: f64,
    pub balance_cash: f64,
    pub performance: PerformanceBody,
}

impl From<UpgradeReceipt> for UpgradeResponse {
    fn from(receipt: UpgradeReceipt) -> Self {
        let part = receipt.part.as_str();
        Self {
            success: true,
            message: format!("{part} level {} installed", receipt.level),
            part: part.to_owned(),
            level: receipt.level,
            price: receipt.price,
            balance_cash: receipt.wallet.cash,
            performance: receipt.performance.into(),
        }
    }
}

/// Pay for a valve tune; success odds rise with garage level.
#[utoipa::path(
    post,
    path = "/api/tune/valves/{tg_id}",
    params(("tg_id" = i64, Path, description = "Telegram user id")),
    responses(
        (status = 200, description = "Attempt charged; see success flag", body = ValveTuneResponse),
        (status = 402, description = "Not enough cash", body = ErrorSchema),
        (status = 404, description = "Player or car not found", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["garage"],
    operation_id = "tuneValves"
)]
#[post("/tune/valves/{tg_id}")]
pub async fn tune_valves(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ValveTuneResponse>> {
    let telegram_id = TelegramId::new(path.into_inner());
    let outcome = state.garage.tune_valves(telegram_id).await?;
    Ok(web::Json(outcome.into()))
}

/// Pay for an engine calibration.
#[utoipa::path(
    post,
    path = "/api/tune/engine/{tg_id}",
    params(("tg_id" = i64, Path, description = "Telegram user id")),
    responses(
        (status = 200, description = "Engine calibrated", body = EngineTuneResponse),
        (status = 402, description = "Not enough cash", body = ErrorSchema),
        (status = 404, description = "Player or car not found", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["garage"],
    operation_id = "tuneEngine"
)]
#[post("/tune/engine/{tg_id}")]
pub async fn tune_engine(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<EngineTuneResponse>> {
    let telegram_id = TelegramId::new(path.into_inner());
    let outcome = state.garage.tune_engine(telegram_id).await?;
    Ok(web::Json(outcome.into()))
}

async fn install(
    state: &HttpState,
    telegram_id: i64,
    upgrade: PartUpgrade,
) -> ApiResult<web::Json<UpgradeResponse>> {
    let receipt = state
        .garage
        .upgrade(UpgradeRequest {
            telegram_id: TelegramId::new(telegram_id),
            upgrade,
        })
        .await?;
    Ok(web::Json(receipt.into()))
}

/// Install a turbo level.
#[utoipa::path(
    post,
    path = "/api/upgrade/turbo/{tg_id}",
    params(
        ("tg_id" = i64, Path, description = "Telegram user id"),
        ("level" = u8, Query, description = "Turbo level 1-3")
    ),
    responses(
        (status = 200, description = "Turbo installed", body = UpgradeResponse),
        (status = 400, description = "Invalid or non-increasing level", body = ErrorSchema),
        (status = 402, description = "Not enough cash", body = ErrorSchema),
        (status = 404, description = "Player or car not found", body = ErrorSchema)
    ),
    tags = ["garage"],
    operation_id = "upgradeTurbo"
)]
#[post("/upgrade/turbo/{tg_id}")]
pub async fn upgrade_turbo(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<LevelQuery>,
) -> ApiResult<web::Json<UpgradeResponse>> {
    let level = parse_level(query.level.as_deref(), FieldName::new("level"))?;
    let upgrade = PartUpgrade::turbo(level).map_err(map_upgrade_error)?;
    install(&state, path.into_inner(), upgrade).await
}

/// Install a suspension level.
#[utoipa::path(
    post,
    path = "/api/upgrade/suspension/{tg_id}",
    params(
        ("tg_id" = i64, Path, description = "Telegram user id"),
        ("level" = u8, Query, description = "Suspension level 1-3")
    ),
    responses(
        (status = 200, description = "Suspension installed", body = UpgradeResponse),
        (status = 400, description = "Invalid or non-increasing level", body = ErrorSchema),
        (status = 402, description = "Not enough cash", body = ErrorSchema),
        (status = 404, description = "Player or car not found", body = ErrorSchema)
    ),
    tags = ["garage"],
    operation_id = "upgradeSuspension"
)]
#[post("/upgrade/suspension/{tg_id}")]
pub async fn upgrade_suspension(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<LevelQuery>,
) -> ApiResult<web::Json<UpgradeResponse>> {
    let level = parse_level(query.level.as_deref(), FieldName::new("level"))?;
    let upgrade = PartUpgrade::suspension(level).map_err(map_upgrade_error)?;
    install(&state, path.into_inner(), upgrade).await
}

/// Install a subwoofer with brand and music genre.
#[utoipa::path(
    post,
    path = "/api/upgrade/subwoofer/{tg_id}",
    params(
        ("tg_id" = i64, Path, description = "Telegram user id"),
        ("level" = u8, Query, description = "Subwoofer level 1-3"),
        ("brand" = String, Query, description = "Subwoofer brand"),
        ("genre" = String, Query, description = "Music genre played on it")
    ),
    responses(
        (status = 200, description = "Subwoofer installed", body = UpgradeResponse),
        (status = 400, description = "Invalid level or labels", body = ErrorSchema),
        (status = 402, description = "Not enough cash", body = ErrorSchema),
        (status = 404, description = "Player or car not found", body = ErrorSchema)
    ),
    tags = ["garage"],
    operation_id = "upgradeSubwoofer"
)]
#[post("/upgrade/subwoofer/{tg_id}")]
pub async fn upgrade_subwoofer(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<SubwooferQuery>,
) -> ApiResult<web::Json<UpgradeResponse>> {
    let level = parse_level(query.level.as_deref(), FieldName::new("level"))?;
    let brand = require(query.brand.as_deref(), FieldName::new("brand"))?;
    let genre = require(query.genre.as_deref(), FieldName::new("genre"))?;
    let upgrade = PartUpgrade::subwoofer(level, brand, genre).map_err(map_upgrade_error)?;
    install(&state, path.into_inner(), upgrade).await
}

#[cfg(test)]
#[path = "garage_tests.rs"]
mod tests;
