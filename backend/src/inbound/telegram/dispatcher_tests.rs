//! Tests for the Telegram update dispatcher.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockBotMessenger, MockGarageCommand, MockGarageQuery};
use crate::domain::{GarageService, TelegramId};
use crate::inbound::telegram::dto::ChatDto;
use crate::test_support::{
    FixedDice, InMemoryStore, RecordingMessenger, SentMessage, sample_profile,
};

const ADMIN: i64 = 1;
const WEBAPP: &str = "https://gunter.example";

fn user(id: i64) -> UserDto {
    UserDto {
        id,
        username: Some(format!("racer{id}")),
        first_name: Some("Gunter".to_owned()),
    }
}

fn text_update(from: i64, text: &str) -> Update {
    Update {
        update_id: 1,
        message: Some(MessageDto {
            message_id: 10,
            from: Some(user(from)),
            chat: ChatDto { id: from },
            text: Some(text.to_owned()),
        }),
        callback_query: None,
    }
}

fn callback_update(from: i64, data: &str) -> Update {
    Update {
        update_id: 2,
        message: None,
        callback_query: Some(CallbackQueryDto {
            id: "cb-1".to_owned(),
            from: user(from),
            message: Some(MessageDto {
                message_id: 77,
                from: None,
                chat: ChatDto { id: from },
                text: Some("menu".to_owned()),
            }),
            data: Some(data.to_owned()),
        }),
    }
}

/// Dispatcher backed by the in-memory store and a real garage service.
fn in_memory_dispatcher(store: &InMemoryStore) -> (BotDispatcher, RecordingMessenger) {
    let service = Arc::new(GarageService::new(
        Arc::new(store.players()),
        Arc::new(FixedDice::default()),
        Some(TelegramId::new(ADMIN)),
    ));
    let messenger = RecordingMessenger::new();
    let dispatcher = BotDispatcher::new(
        BotPorts {
            garage_query: service.clone(),
            garage: service,
            messenger: Arc::new(messenger.clone()),
        },
        WEBAPP,
    );
    (dispatcher, messenger)
}

fn mocked_dispatcher(
    query: MockGarageQuery,
    command: MockGarageCommand,
    messenger: MockBotMessenger,
) -> BotDispatcher {
    BotDispatcher::new(
        BotPorts {
            garage_query: Arc::new(query),
            garage: Arc::new(command),
            messenger: Arc::new(messenger),
        },
        WEBAPP,
    )
}

fn sent_text(message: &SentMessage) -> &str {
    match message {
        SentMessage::Sent { reply, .. } | SentMessage::Edited { reply, .. } => &reply.text,
        SentMessage::Answered { .. } => "",
    }
}

#[tokio::test]
async fn start_registers_player_and_sends_welcome() {
    let store = InMemoryStore::new();
    let (dispatcher, messenger) = in_memory_dispatcher(&store);

    dispatcher
        .dispatch(text_update(42, "/start"))
        .await
        .expect("dispatch succeeds");

    let profile = store
        .profile(TelegramId::new(42))
        .await
        .expect("player registered");
    assert!(profile.car.is_some(), "starter car missing");
    let messages = messenger.messages().await;
    assert_eq!(messages.len(), 1);
    let SentMessage::Sent { chat, reply } = &messages[0] else {
        panic!("expected a new message, got {messages:?}");
    };
    assert_eq!(*chat, ChatId(42));
    assert_eq!(*reply, render::welcome(WEBAPP));
}

#[tokio::test]
async fn repeated_start_keeps_a_single_player() {
    let store = InMemoryStore::new();
    let (dispatcher, messenger) = in_memory_dispatcher(&store);

    for _ in 0..2 {
        dispatcher
            .dispatch(text_update(42, "/start"))
            .await
            .expect("dispatch succeeds");
    }

    assert_eq!(messenger.messages().await.len(), 2);
    let profile = store.profile(TelegramId::new(42)).await.expect("player");
    assert!((profile.player.wallet.cash - 5000.0).abs() < 1e-9);
}

#[tokio::test]
async fn profile_callback_edits_the_menu_and_answers() {
    let store = InMemoryStore::new();
    store.insert_profile(sample_profile(1, 42)).await;
    let (dispatcher, messenger) = in_memory_dispatcher(&store);

    dispatcher
        .dispatch(callback_update(42, CallbackAction::PROFILE))
        .await
        .expect("dispatch succeeds");

    let messages = messenger.messages().await;
    assert_eq!(messages.len(), 2);
    assert!(matches!(
        &messages[0],
        SentMessage::Edited { chat: ChatId(42), message_id: 77, .. }
    ));
    assert!(sent_text(&messages[0]).contains("racer42"));
    assert_eq!(
        messages[1],
        SentMessage::Answered {
            callback_id: "cb-1".to_owned(),
            text: None,
        }
    );
}

#[tokio::test]
async fn profile_callback_for_unknown_player_suggests_start() {
    let store = InMemoryStore::new();
    let (dispatcher, messenger) = in_memory_dispatcher(&store);

    dispatcher
        .dispatch(callback_update(42, CallbackAction::TOKENS))
        .await
        .expect("not-found is answered in chat");

    let messages = messenger.messages().await;
    assert_eq!(sent_text(&messages[0]), render::player_not_found().text);
}

#[tokio::test]
async fn donate_callback_credits_tokens() {
    let store = InMemoryStore::new();
    store.insert_profile(sample_profile(1, 42)).await;
    let (dispatcher, messenger) = in_memory_dispatcher(&store);

    dispatcher
        .dispatch(callback_update(42, &CallbackAction::donate_data(500)))
        .await
        .expect("dispatch succeeds");

    let profile = store.profile(TelegramId::new(42)).await.expect("player");
    assert!((profile.player.wallet.tokens - 550.0).abs() < 1e-9);
    let messages = messenger.messages().await;
    assert!(sent_text(&messages[0]).contains("550 GTR"));
}

#[tokio::test]
async fn donate_callback_with_unknown_amount_is_rejected_in_chat() {
    let store = InMemoryStore::new();
    store.insert_profile(sample_profile(1, 42)).await;
    let (dispatcher, messenger) = in_memory_dispatcher(&store);

    dispatcher
        .dispatch(callback_update(42, &CallbackAction::donate_data(7)))
        .await
        .expect("invalid amount is answered in chat");

    let messages = messenger.messages().await;
    assert!(sent_text(&messages[0]).starts_with("❌"));
    let profile = store.profile(TelegramId::new(42)).await.expect("player");
    assert!(profile.player.wallet.tokens.abs() < 1e-9);
}

#[tokio::test]
async fn airdrop_from_admin_sends_summary_and_csv() {
    let store = InMemoryStore::new();
    store.insert_profile(sample_profile(1, ADMIN)).await;
    store.insert_profile(sample_profile(2, 42)).await;
    let (dispatcher, messenger) = in_memory_dispatcher(&store);

    dispatcher
        .dispatch(text_update(ADMIN, "/airdrop"))
        .await
        .expect("dispatch succeeds");

    let messages = messenger.messages().await;
    assert_eq!(messages.len(), 2);
    assert!(sent_text(&messages[0]).contains("Holders: 2"));
    assert!(sent_text(&messages[1]).contains("tg_id,balance_token"));
}

#[tokio::test]
async fn airdrop_from_regular_player_is_refused() {
    let store = InMemoryStore::new();
    let (dispatcher, messenger) = in_memory_dispatcher(&store);

    dispatcher
        .dispatch(text_update(42, "/airdrop"))
        .await
        .expect("refusal is answered in chat");

    let messages = messenger.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(sent_text(&messages[0]), render::forbidden().text);
}

#[rstest]
#[case::plain_text("hello there")]
#[case::unknown_command("/garage")]
#[tokio::test]
async fn ignores_messages_without_commands(#[case] text: &str) {
    let mut messenger = MockBotMessenger::new();
    messenger.expect_send_message().never();
    let dispatcher = mocked_dispatcher(MockGarageQuery::new(), MockGarageCommand::new(), messenger);

    dispatcher
        .dispatch(text_update(42, text))
        .await
        .expect("ignored");
}

#[tokio::test]
async fn unknown_callback_gets_a_toast() {
    let mut messenger = MockBotMessenger::new();
    messenger
        .expect_answer_callback()
        .withf(|id, text| id == "cb-1" && text.as_deref() == Some("Unknown action"))
        .times(1)
        .returning(|_, _| Ok(()));
    messenger.expect_edit_message().never();
    let dispatcher = mocked_dispatcher(MockGarageQuery::new(), MockGarageCommand::new(), messenger);

    dispatcher
        .dispatch(callback_update(42, "teleport"))
        .await
        .expect("unknown callback answered");
}

#[tokio::test]
async fn internal_failure_answers_callback_and_returns_error() {
    let mut query = MockGarageQuery::new();
    query
        .expect_profile()
        .returning(|_| Err(Error::service_unavailable("database down")));
    let mut messenger = MockBotMessenger::new();
    messenger
        .expect_answer_callback()
        .withf(|_, text| text.as_deref() == Some(TRY_AGAIN_LATER))
        .times(1)
        .returning(|_, _| Ok(()));
    messenger.expect_edit_message().never();
    let dispatcher = mocked_dispatcher(query, MockGarageCommand::new(), messenger);

    let error = dispatcher
        .dispatch(callback_update(42, CallbackAction::PROFILE))
        .await
        .expect_err("internal failure surfaces");

    assert!(matches!(
        error,
        DispatchError::Domain(err) if err.code() == ErrorCode::ServiceUnavailable
    ));
}

#[tokio::test]
async fn delivery_failure_is_returned() {
    let mut command = MockGarageCommand::new();
    command.expect_register().returning(|player| {
        Ok(crate::domain::ports::Registration {
            profile: sample_profile(1, player.telegram_id.get()),
            created: true,
        })
    });
    let mut messenger = MockBotMessenger::new();
    messenger
        .expect_send_message()
        .returning(|_, _| Err(BotMessengerError::transport("timeout")));
    let dispatcher = mocked_dispatcher(MockGarageQuery::new(), command, messenger);

    let error = dispatcher
        .dispatch(text_update(42, "/start"))
        .await
        .expect_err("delivery failure surfaces");

    assert!(matches!(error, DispatchError::Messenger(_)));
}
