//! LedgerBuddy Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use LedgerBuddy::{
    config::Settings,
    utils::logging,
    services::ServiceFactory,
    state::{ConversationEngine, EngineOptions},
    handlers::{self, Command},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration; missing token or credentials stop the process here
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", LedgerBuddy::info());

    // Initialize services
    info!("Connecting to Google Sheets...");
    let services = ServiceFactory::new(&settings).await?;
    let target = services.connect().await?;
    info!(spreadsheet_id = %target.spreadsheet_id, worksheet = %target.worksheet, "Spreadsheet ready");

    // Initialize conversation engine
    let options = EngineOptions::from(settings.conversation);
    info!(
        allow_today_keyword = options.allow_today_keyword,
        allow_back_navigation = options.allow_back_navigation,
        "Conversation options"
    );
    let engine = Arc::new(ConversationEngine::new(options, services.record_sink()));

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let handler = handlers::schema();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("LedgerBuddy bot is ready, starting polling...");

    dispatcher.dispatch().await;

    info!("LedgerBuddy bot has been shut down.");

    Ok(())
}
