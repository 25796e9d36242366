//! Handler glue tests
//!
//! Checks the pieces between Telegram types and the conversation engine.

mod helpers;

use assert_matches::assert_matches;
use teloxide::types::{ChatId, ReplyMarkup};
use helpers::*;
use LedgerBuddy::handlers::{author_name, keyboards::reply_markup, route_message, schema, MessageRoute};
use LedgerBuddy::state::{EngineOptions, Inbound, KeyboardHint};

#[test]
fn test_author_name_uses_full_name() {
    let user = create_test_user(test_user_id(), "Иван", Some("Петров"));
    assert_eq!(author_name(&user), "Иван Петров");

    let user = create_test_user(test_user_id(), "Мария", None);
    assert_eq!(author_name(&user), "Мария");
}

#[test]
fn test_private_text_goes_to_conversation() {
    let chat = ChatId(test_user_id());
    assert_eq!(route_message(chat, Some("25.12.2025")), MessageRoute::Text("25.12.2025"));
    assert_eq!(route_message(chat, Some("")), MessageRoute::Text(""));
}

#[test]
fn test_private_non_text_asks_for_text() {
    assert_eq!(route_message(ChatId(test_user_id()), None), MessageRoute::NonText);
}

#[test]
fn test_group_messages_are_ignored() {
    // Basic group and supergroup ids
    assert_eq!(route_message(ChatId(-4012345678), Some("25.12.2025")), MessageRoute::Ignore);
    assert_eq!(route_message(ChatId(-1001234567890), Some("/add")), MessageRoute::Ignore);
    assert_eq!(route_message(ChatId(-1001234567890), None), MessageRoute::Ignore);
}

#[test]
fn test_dispatcher_schema_builds() {
    // Building the tree checks that every endpoint is injectable
    let _handler = schema();
}

#[test]
fn test_keyboard_hints_render() {
    assert_matches!(reply_markup(KeyboardHint::None), ReplyMarkup::KeyboardRemove(_));

    let ReplyMarkup::Keyboard(markup) = reply_markup(KeyboardHint::TypeChoice { back: true }) else {
        panic!("expected a reply keyboard");
    };
    assert_eq!(markup.keyboard.len(), 2);
}

#[tokio::test]
async fn test_every_reply_renders_a_keyboard() {
    let (engine, _) = test_engine(EngineOptions::default());
    let user = create_test_user(test_user_id(), "Иван", Some("Петров"));
    let author = author_name(&user);
    let id = user.id.0 as i64;

    let mut replies = vec![engine.handle(id, &author, Inbound::Start).await.unwrap()];
    for input in ["25.12.2025", "➖ Расход", "10", "Кофе", "-"] {
        replies.push(engine.handle(id, &author, Inbound::Text(input)).await.unwrap());
    }

    let kinds: Vec<bool> = replies
        .into_iter()
        .map(|r| matches!(reply_markup(r.keyboard), ReplyMarkup::Keyboard(_)))
        .collect();
    // Keyboards while collecting, removed after the confirmation
    assert_eq!(kinds, vec![true, true, true, true, true, false]);
}
