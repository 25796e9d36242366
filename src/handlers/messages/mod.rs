//! Message handlers module
//!
//! Feeds text messages from private chats into the conversation engine

use std::sync::Arc;
use teloxide::{Bot, types::{ChatId, Message}, prelude::*};
use tracing::debug;
use crate::handlers::{author_name, send_reply};
use crate::state::{ConversationEngine, Inbound};
use crate::utils::errors::{LedgerBuddyError, Result};

pub const TEXT_ONLY: &str = "Отправь ответ текстом, пожалуйста.";

/// What to do with an incoming message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRoute<'a> {
    /// Not a private chat; conversations only run one-on-one
    Ignore,
    /// Sticker, photo, voice and the like
    NonText,
    /// Conversation input
    Text(&'a str),
}

/// Decide how a message from `chat_id` carrying `text` is handled
pub fn route_message(chat_id: ChatId, text: Option<&str>) -> MessageRoute<'_> {
    if !chat_id.is_user() {
        return MessageRoute::Ignore;
    }

    match text {
        Some(text) => MessageRoute::Text(text),
        None => MessageRoute::NonText,
    }
}

/// Handle incoming messages
pub async fn handle_message(bot: Bot, msg: Message, engine: Arc<ConversationEngine>) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        LedgerBuddyError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    match route_message(chat_id, msg.text()) {
        MessageRoute::Ignore => {
            debug!(user_id = user_id, chat_id = ?chat_id, "Ignoring group message");
            Ok(())
        }
        MessageRoute::NonText => {
            debug!(user_id = user_id, "Non-text message received");
            bot.send_message(chat_id, TEXT_ONLY).await?;
            Ok(())
        }
        MessageRoute::Text(text) => {
            let reply = engine.handle(user_id, &author_name(user), Inbound::Text(text)).await?;
            send_reply(&bot, chat_id, reply).await
        }
    }
}
