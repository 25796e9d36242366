//! Start and cancel command handlers
//!
//! `/start` and `/add` open a new record, `/cancel` drops the current one.

use std::sync::Arc;
use teloxide::{Bot, types::Message, prelude::*};
use tracing::debug;
use crate::handlers::{author_name, send_reply};
use crate::state::{ConversationEngine, Inbound};
use crate::utils::errors::{LedgerBuddyError, Result};

const PRIVATE_ONLY: &str = "Эта команда доступна только в личных сообщениях.";

/// Handle /start and /add - begin a new record
pub async fn handle_start(bot: Bot, msg: Message, engine: Arc<ConversationEngine>) -> Result<()> {
    run_command(bot, msg, engine, Inbound::Start).await
}

/// Handle /cancel - abort the record in progress
pub async fn handle_cancel(bot: Bot, msg: Message, engine: Arc<ConversationEngine>) -> Result<()> {
    run_command(bot, msg, engine, Inbound::Cancel).await
}

async fn run_command(bot: Bot, msg: Message, engine: Arc<ConversationEngine>, event: Inbound<'_>) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        LedgerBuddyError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, chat_id = ?chat_id, event = ?event, "Processing command");

    if !chat_id.is_user() {
        bot.send_message(chat_id, PRIVATE_ONLY).await?;
        return Ok(());
    }

    let reply = engine.handle(user_id, &author_name(user), event).await?;
    send_reply(&bot, chat_id, reply).await
}
