//! `POST /webhook`: entry point for Telegram updates.
//!
//! Telegram redelivers updates that receive a non-2xx answer, so every
//! update is acknowledged. Parse and dispatch failures are logged instead.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use super::dispatcher::BotDispatcher;
use super::dto::Update;

/// Body returned to Telegram for every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebhookAck {
    #[schema(example = true)]
    pub ok: bool,
}

/// Receive one Telegram update.
#[utoipa::path(
    post,
    path = "/webhook",
    request_body(content = serde_json::Value, description = "Telegram update object"),
    responses((status = 200, description = "Update acknowledged", body = WebhookAck)),
    tags = ["telegram"],
    operation_id = "telegramWebhook"
)]
#[post("/webhook")]
pub async fn webhook(
    dispatcher: web::Data<BotDispatcher>,
    body: web::Bytes,
) -> web::Json<WebhookAck> {
    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            let update_id = update.update_id;
            if let Err(err) = dispatcher.dispatch(update).await {
                error!(update_id, error = %err, "failed to handle Telegram update");
            }
        }
        Err(err) => warn!(error = %err, "discarding undecodable Telegram update"),
    }
    web::Json(WebhookAck { ok: true })
}
