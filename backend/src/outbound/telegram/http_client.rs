//! Reqwest-backed Telegram Bot API client.
//!
//! The adapter owns transport details only: URL construction, JSON request
//! bodies, and mapping of transport failures and `ok: false` envelopes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::debug;

use super::dto::{
    AnswerCallbackQueryDto, ApiResponseDto, EditMessageTextDto, SendMessageDto, SetWebhookDto,
};
use crate::domain::ports::{BotMessenger, BotMessengerError, ChatId, ChatReply};

const DEFAULT_API_ROOT: &str = "https://api.telegram.org";

/// Bot API client bound to one bot token.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: Url,
}

impl TelegramClient {
    /// Build a client against the public Bot API.
    ///
    /// # Errors
    ///
    /// Returns an error when the token does not form a valid URL or the
    /// reqwest client cannot be constructed.
    pub fn new(token: &str, timeout: Duration) -> Result<Self, BotMessengerError> {
        Self::with_api_root(DEFAULT_API_ROOT, token, timeout)
    }

    /// Build a client against an alternative API root, such as a local Bot
    /// API server.
    ///
    /// # Errors
    ///
    /// Returns an error when the root and token do not form a valid URL or
    /// the reqwest client cannot be constructed.
    pub fn with_api_root(
        api_root: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<Self, BotMessengerError> {
        let base_url = bot_base_url(api_root, token)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| BotMessengerError::transport(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Point Telegram at the webhook URL that receives updates.
    ///
    /// # Errors
    ///
    /// Returns an error when the call fails or Telegram rejects the URL.
    pub async fn set_webhook(&self, url: &str) -> Result<(), BotMessengerError> {
        self.call("setWebhook", &SetWebhookDto { url }).await
    }

    async fn call<B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<(), BotMessengerError> {
        let url = self
            .base_url
            .join(method)
            .map_err(|err| BotMessengerError::transport(err.to_string()))?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| BotMessengerError::transport(err.without_url().to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| BotMessengerError::transport(err.without_url().to_string()))?;
        debug!(method, status = status.as_u16(), "telegram call completed");
        parse_envelope(status.as_u16(), bytes.as_ref())
    }
}

#[async_trait]
impl BotMessenger for TelegramClient {
    async fn send_message(&self, chat: ChatId, reply: &ChatReply) -> Result<(), BotMessengerError> {
        self.call("sendMessage", &SendMessageDto::new(chat.0, reply))
            .await
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: i64,
        reply: &ChatReply,
    ) -> Result<(), BotMessengerError> {
        self.call(
            "editMessageText",
            &EditMessageTextDto::new(chat.0, message_id, reply),
        )
        .await
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<String>,
    ) -> Result<(), BotMessengerError> {
        let body = AnswerCallbackQueryDto {
            callback_query_id: callback_id,
            text: text.as_deref(),
        };
        self.call("answerCallbackQuery", &body).await
    }
}

fn bot_base_url(api_root: &str, token: &str) -> Result<Url, BotMessengerError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(BotMessengerError::transport("bot token must not be empty"));
    }
    let root = api_root.trim_end_matches('/');
    Url::parse(&format!("{root}/bot{token}/"))
        .map_err(|err| BotMessengerError::transport(format!("invalid bot API URL: {err}")))
}

/// Telegram answers errors with a non-2xx status and an `ok: false` body, so
/// the envelope decides the outcome.
fn parse_envelope(status: u16, body: &[u8]) -> Result<(), BotMessengerError> {
    let envelope: ApiResponseDto = serde_json::from_slice(body).map_err(|err| {
        BotMessengerError::transport(format!("status {status}: undecodable response: {err}"))
    })?;
    if envelope.ok {
        return Ok(());
    }
    Err(BotMessengerError::rejected(
        envelope
            .description
            .unwrap_or_else(|| format!("status {status}")),
    ))
}

#[cfg(test)]
#[path = "http_client_tests.rs"]
mod tests;
