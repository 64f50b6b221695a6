//! Wire DTOs for the Telegram Bot API.
//!
//! Replies are mapped from the transport-neutral [`ChatReply`] into these
//! request bodies in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{ButtonAction, ChatReply, Keyboard, KeyboardButton};

pub(super) const PARSE_MODE_HTML: &str = "HTML";

#[derive(Debug, Serialize)]
pub(super) struct SendMessageDto<'a> {
    pub(super) chat_id: i64,
    pub(super) text: &'a str,
    pub(super) parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) reply_markup: Option<InlineKeyboardMarkupDto<'a>>,
}

impl<'a> SendMessageDto<'a> {
    pub(super) fn new(chat_id: i64, reply: &'a ChatReply) -> Self {
        Self {
            chat_id,
            text: reply.text.as_str(),
            parse_mode: PARSE_MODE_HTML,
            reply_markup: reply.keyboard.as_ref().map(InlineKeyboardMarkupDto::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct EditMessageTextDto<'a> {
    pub(super) chat_id: i64,
    pub(super) message_id: i64,
    pub(super) text: &'a str,
    pub(super) parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) reply_markup: Option<InlineKeyboardMarkupDto<'a>>,
}

impl<'a> EditMessageTextDto<'a> {
    pub(super) fn new(chat_id: i64, message_id: i64, reply: &'a ChatReply) -> Self {
        Self {
            chat_id,
            message_id,
            text: reply.text.as_str(),
            parse_mode: PARSE_MODE_HTML,
            reply_markup: reply.keyboard.as_ref().map(InlineKeyboardMarkupDto::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct AnswerCallbackQueryDto<'a> {
    pub(super) callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct SetWebhookDto<'a> {
    pub(super) url: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct InlineKeyboardMarkupDto<'a> {
    pub(super) inline_keyboard: Vec<Vec<InlineKeyboardButtonDto<'a>>>,
}

impl<'a> From<&'a Keyboard> for InlineKeyboardMarkupDto<'a> {
    fn from(keyboard: &'a Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| row.iter().map(InlineKeyboardButtonDto::from).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct InlineKeyboardButtonDto<'a> {
    pub(super) text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) callback_data: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) web_app: Option<WebAppInfoDto<'a>>,
}

impl<'a> From<&'a KeyboardButton> for InlineKeyboardButtonDto<'a> {
    fn from(button: &'a KeyboardButton) -> Self {
        let (callback_data, web_app) = match &button.action {
            ButtonAction::Callback(data) => (Some(data.as_str()), None),
            ButtonAction::WebApp(url) => (None, Some(WebAppInfoDto { url: url.as_str() })),
        };
        Self {
            text: button.text.as_str(),
            callback_data,
            web_app,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct WebAppInfoDto<'a> {
    pub(super) url: &'a str,
}

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponseDto {
    pub(super) ok: bool,
    #[serde(default)]
    pub(super) description: Option<String>,
}
