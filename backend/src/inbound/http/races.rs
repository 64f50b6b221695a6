//! Street race handler.
//!
//! ```text
//! POST /api/race/bot/{tg_id}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::TelegramId;
use crate::domain::ports::RaceReport;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Race result with the balances after rewards or penalties.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaceResponse {
    pub is_winner: bool,
    pub message: String,
    /// Cash actually moved; negative on a loss.
    pub cash_delta: f64,
    pub token_delta: f64,
    pub player_score: f64,
    pub bot_score: f64,
    pub balance_cash: f64,
    pub balance_token: f64,
    pub reputation: i32,
}

impl From<RaceReport> for RaceResponse {
    fn from(report: RaceReport) -> Self {
        let outcome = report.outcome;
        let message = if outcome.is_winner {
            format!(
                "You left the bot behind! +{:.0} $ and +{:.0} GTR",
                report.cash_delta, outcome.token_delta
            )
        } else {
            format!("The bot was faster. You lost {:.0} $", -report.cash_delta)
        };
        Self {
            is_winner: outcome.is_winner,
            message,
            cash_delta: report.cash_delta,
            token_delta: outcome.token_delta,
            player_score: outcome.player_score,
            bot_score: outcome.bot_score,
            balance_cash: report.wallet.cash,
            balance_token: report.wallet.tokens,
            reputation: report.reputation,
        }
    }
}

/// Race the scripted street bot.
#[utoipa::path(
    post,
    path = "/api/race/bot/{tg_id}",
    params(("tg_id" = i64, Path, description = "Telegram user id")),
    responses(
        (status = 200, description = "Race resolved", body = RaceResponse),
        (status = 404, description = "Player or car not found", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["races"],
    operation_id = "raceBot"
)]
#[post("/race/bot/{tg_id}")]
pub async fn race_bot(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RaceResponse>> {
    let telegram_id = TelegramId::new(path.into_inner());
    let report = state.races.race_bot(telegram_id).await?;
    Ok(web::Json(report.into()))
}
