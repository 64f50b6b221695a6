//! Routes Telegram updates to garage use cases and replies in chat.
//!
//! Player-facing failures (unknown player, bad donation amount, missing
//! admin rights) become chat messages. Anything else is returned to the
//! webhook, which logs it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{
    BotMessenger, BotMessengerError, ChatId, ChatReply, GarageCommand, GarageQuery,
};
use crate::domain::{Error, ErrorCode};

use super::command::{BotCommand, CallbackAction};
use super::dto::{CallbackQueryDto, MessageDto, Update, UserDto};
use super::render;

const TRY_AGAIN_LATER: &str = "Something went wrong, try again later";

/// Failure while handling one update.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("garage use case failed: {0}")]
    Domain(#[from] Error),
    #[error(transparent)]
    Messenger(#[from] BotMessengerError),
}

/// Ports the dispatcher drives.
#[derive(Clone)]
pub struct BotPorts {
    pub garage_query: Arc<dyn GarageQuery>,
    pub garage: Arc<dyn GarageCommand>,
    pub messenger: Arc<dyn BotMessenger>,
}

pub struct BotDispatcher {
    garage_query: Arc<dyn GarageQuery>,
    garage: Arc<dyn GarageCommand>,
    messenger: Arc<dyn BotMessenger>,
    webapp_url: String,
}

/// Map player-facing domain errors to a chat reply.
fn player_facing(error: &Error) -> Option<ChatReply> {
    match error.code() {
        ErrorCode::NotFound => Some(render::player_not_found()),
        ErrorCode::Forbidden => Some(render::forbidden()),
        ErrorCode::InvalidRequest | ErrorCode::InsufficientFunds => {
            Some(render::rejected(error.message()))
        }
        _ => None,
    }
}

fn reply_or_error(result: Result<ChatReply, Error>) -> Result<ChatReply, Error> {
    result.or_else(|err| player_facing(&err).ok_or(err))
}

impl BotDispatcher {
    pub fn new(ports: BotPorts, webapp_url: impl Into<String>) -> Self {
        Self {
            garage_query: ports.garage_query,
            garage: ports.garage,
            messenger: ports.messenger,
            webapp_url: webapp_url.into(),
        }
    }

    /// Handle one update. Updates the bot does not react to are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when a use case fails for reasons the player cannot
    /// fix or when the reply cannot be delivered.
    pub async fn dispatch(&self, update: Update) -> Result<(), DispatchError> {
        if let Some(callback) = update.callback_query {
            return self.handle_callback(callback).await;
        }
        if let Some(message) = update.message {
            return self.handle_message(message).await;
        }
        debug!(update_id = update.update_id, "ignoring update without message");
        Ok(())
    }

    async fn handle_message(&self, message: MessageDto) -> Result<(), DispatchError> {
        let command = message.text.as_deref().and_then(BotCommand::parse);
        let (Some(command), Some(from)) = (command, message.from.as_ref()) else {
            return Ok(());
        };
        let chat = message.chat_id();
        match command {
            BotCommand::Start => self.start(chat, from).await,
            BotCommand::Airdrop => self.airdrop(chat, from).await,
        }
    }

    async fn start(&self, chat: ChatId, from: &UserDto) -> Result<(), DispatchError> {
        let registration = self.garage.register(from.to_new_player()).await?;
        debug!(
            telegram_id = from.id,
            created = registration.created,
            "handled /start"
        );
        self.messenger
            .send_message(chat, &render::welcome(&self.webapp_url))
            .await?;
        Ok(())
    }

    async fn airdrop(&self, chat: ChatId, from: &UserDto) -> Result<(), DispatchError> {
        let replies = match self.garage_query.token_snapshot(from.telegram_id()).await {
            Ok(snapshot) => {
                info!(
                    holders = snapshot.holdings.len(),
                    total = snapshot.total(),
                    "airdrop snapshot taken"
                );
                render::airdrop_snapshot(&snapshot)
            }
            Err(err) => vec![player_facing(&err).ok_or(err)?],
        };
        for reply in &replies {
            self.messenger.send_message(chat, reply).await?;
        }
        Ok(())
    }

    async fn handle_callback(&self, callback: CallbackQueryDto) -> Result<(), DispatchError> {
        let action = CallbackAction::parse(callback.data.as_deref().unwrap_or_default());
        if let CallbackAction::Unknown(data) = &action {
            debug!(data = %data, "unknown callback data");
            self.messenger
                .answer_callback(&callback.id, Some("Unknown action".to_owned()))
                .await?;
            return Ok(());
        }

        let reply = match reply_or_error(self.callback_reply(&callback.from, action).await) {
            Ok(reply) => reply,
            Err(err) => {
                self.messenger
                    .answer_callback(&callback.id, Some(TRY_AGAIN_LATER.to_owned()))
                    .await?;
                return Err(err.into());
            }
        };

        match &callback.message {
            Some(message) => {
                self.messenger
                    .edit_message(message.chat_id(), message.message_id, &reply)
                    .await?;
            }
            // Private chat ids equal the user id.
            None => {
                self.messenger
                    .send_message(ChatId(callback.from.id), &reply)
                    .await?;
            }
        }
        self.messenger.answer_callback(&callback.id, None).await?;
        Ok(())
    }

    async fn callback_reply(
        &self,
        from: &UserDto,
        action: CallbackAction,
    ) -> Result<ChatReply, Error> {
        let telegram_id = from.telegram_id();
        match action {
            CallbackAction::Profile => {
                let profile = self.garage_query.profile(telegram_id).await?;
                Ok(render::profile(&profile))
            }
            CallbackAction::Tokens => {
                let profile = self.garage_query.profile(telegram_id).await?;
                Ok(render::tokens(&profile))
            }
            CallbackAction::DonateMenu => Ok(render::donate_menu()),
            CallbackAction::Donate(amount) => {
                let receipt = self.garage.donate(telegram_id, amount).await?;
                Ok(render::donation_received(&receipt))
            }
            CallbackAction::Unknown(data) => Err(Error::invalid_request(format!(
                "unknown callback {data}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
