//! LedgerBuddy Telegram Bot
//!
//! A Telegram bot that walks a user through entering an income or expense
//! record (date, type, amount, category, comment) and appends it as a row to
//! a shared Google spreadsheet.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{LedgerBuddyError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;
pub use state::{ConversationEngine, EngineOptions, RecordSink, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
