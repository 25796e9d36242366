//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Message handlers for conversation input
//! - Reply keyboard rendering

pub mod commands;
pub mod keyboards;
pub mod messages;

// Re-export commonly used handler functions
pub use commands::*;
pub use messages::*;

use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::{prelude::*, types::{ChatId, Update, User}};
use crate::state::{ConversationEngine, Reply};
use crate::utils::errors::Result;
use crate::utils::logging;

/// Error type the dispatcher receives from endpoints
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

type HandlerResult = std::result::Result<(), HandlerError>;

/// Update handler tree: commands first, any other message is conversation input.
/// Endpoints expect an `Arc<ConversationEngine>` among the dispatcher dependencies.
pub fn schema() -> UpdateHandler<HandlerError> {
    use teloxide::dispatching::{HandlerExt, UpdateFilterExt};

    dptree::entry()
        .branch(Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(on_command)
            )
            .branch(dptree::endpoint(on_message))
        )
}

async fn on_command(bot: Bot, msg: Message, cmd: Command, engine: Arc<ConversationEngine>) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, engine).await {
        logging::log_error(&e, "command");
        return Err(e.into());
    }

    Ok(())
}

async fn on_message(bot: Bot, msg: Message, engine: Arc<ConversationEngine>) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, engine).await {
        logging::log_error(&e, "message");
        return Err(e.into());
    }

    Ok(())
}

/// Name written to the spreadsheet as the record's author
pub fn author_name(user: &User) -> String {
    user.full_name()
}

/// Send an engine reply along with its keyboard
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<()> {
    bot.send_message(chat_id, reply.text)
        .reply_markup(keyboards::reply_markup(reply.keyboard))
        .await?;
    Ok(())
}
