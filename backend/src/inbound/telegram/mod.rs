//! Telegram bot adapter: webhook endpoint, update DTOs, command parsing,
//! and HTML rendering of chat replies.

mod command;
mod dispatcher;
mod dto;
mod endpoint;
mod render;

pub use dispatcher::{BotDispatcher, BotPorts, DispatchError};
pub use dto::Update;
pub use endpoint::{WebhookAck, __path_webhook, webhook};
