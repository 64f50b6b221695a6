//! Subset of the Telegram `Update` object the bot reacts to.
//!
//! Unknown fields are ignored so new Bot API additions never break decoding.

use serde::Deserialize;

use crate::domain::ports::ChatId;
use crate::domain::{NewPlayer, TelegramId};

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<MessageDto>,
    #[serde(default)]
    pub callback_query: Option<CallbackQueryDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl UserDto {
    pub fn telegram_id(&self) -> TelegramId {
        TelegramId::new(self.id)
    }

    pub fn to_new_player(&self) -> NewPlayer {
        NewPlayer {
            telegram_id: self.telegram_id(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatDto {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<UserDto>,
    pub chat: ChatDto,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageDto {
    pub fn chat_id(&self) -> ChatId {
        ChatId(self.chat.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQueryDto {
    pub id: String,
    pub from: UserDto,
    /// Absent for buttons on inline-mode messages.
    #[serde(default)]
    pub message: Option<MessageDto>,
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_command_message_and_ignores_unknown_fields() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "message": {
                "message_id": 3,
                "date": 1_700_000_000,
                "from": { "id": 42, "is_bot": false, "first_name": "Gunter", "language_code": "ru" },
                "chat": { "id": 42, "type": "private" },
                "text": "/start"
            }
        }))
        .expect("decode update");

        let message = update.message.expect("message");
        assert_eq!(message.chat_id(), ChatId(42));
        assert_eq!(message.text.as_deref(), Some("/start"));
        let player = message.from.expect("sender").to_new_player();
        assert_eq!(player.telegram_id, TelegramId::new(42));
        assert_eq!(player.username, None);
        assert_eq!(player.first_name.as_deref(), Some("Gunter"));
    }

    #[test]
    fn decodes_callback_query() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 11,
            "callback_query": {
                "id": "cb-9",
                "from": { "id": 42, "username": "racer" },
                "chat_instance": "abc",
                "data": "donate_500",
                "message": { "message_id": 8, "chat": { "id": 42 } }
            }
        }))
        .expect("decode update");

        let callback = update.callback_query.expect("callback");
        assert_eq!(callback.data.as_deref(), Some("donate_500"));
        assert_eq!(callback.message.map(|m| m.message_id), Some(8));
    }
}
