//! Telegram Bot API adapter implementing the chat messenger port.

mod dto;
mod http_client;

pub use http_client::TelegramClient;
