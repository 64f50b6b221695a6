//! Outbound chat port used by the Telegram dispatcher.
//!
//! The reply types are transport neutral so the dispatcher can be tested
//! without HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;

define_port_error! {
    /// Errors raised by chat delivery adapters.
    pub enum BotMessengerError {
        /// The request never reached the chat service.
        Transport { message: String } => "chat transport failed: {message}",
        /// The chat service answered with an error.
        Rejected { description: String } => "chat service rejected the request: {description}",
    }
}

/// Chat a reply is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    /// Send callback data back to the bot.
    Callback(String),
    /// Open a WebApp at the given URL.
    WebApp(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub text: String,
    pub action: ButtonAction,
}

impl KeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn web_app(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::WebApp(url.into()),
        }
    }
}

/// Inline keyboard laid out in rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<KeyboardButton>>,
}

impl Keyboard {
    #[must_use]
    pub fn row(mut self, buttons: Vec<KeyboardButton>) -> Self {
        self.rows.push(buttons);
        self
    }
}

/// HTML-formatted message with an optional keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl ChatReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    #[must_use]
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotMessenger: Send + Sync {
    /// Post a new message.
    async fn send_message(&self, chat: ChatId, reply: &ChatReply) -> Result<(), BotMessengerError>;

    /// Replace the text and keyboard of an existing message.
    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: i64,
        reply: &ChatReply,
    ) -> Result<(), BotMessengerError>;

    /// Acknowledge a button press, optionally with a toast.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<String>,
    ) -> Result<(), BotMessengerError>;
}
