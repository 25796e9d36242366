//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /add, etc.

pub mod start;
pub mod help;

use std::sync::Arc;
use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::state::ConversationEngine;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды LedgerBuddy:")]
pub enum Command {
    #[command(description = "Начать новую запись")]
    Start,
    #[command(description = "Добавить запись")]
    Add,
    #[command(description = "Отменить текущую запись")]
    Cancel,
    #[command(description = "Показать справку")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    engine: Arc<ConversationEngine>,
) -> Result<()> {
    match cmd {
        Command::Start | Command::Add => start::handle_start(bot, msg, engine).await,
        Command::Cancel => start::handle_cancel(bot, msg, engine).await,
        Command::Help => help::handle_help(bot, msg).await,
    }
}
