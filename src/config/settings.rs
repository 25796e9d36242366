//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use config::{builder::DefaultState, ConfigBuilder};
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub sheets: SheetsConfig,
    pub conversation: ConversationConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
}

/// Google Sheets configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetsConfig {
    /// Inline service account key (JSON document)
    pub credentials_json: Option<String>,
    /// Path to a service account key file, used when no inline key is set
    pub credentials_path: Option<String>,
    pub spreadsheet_id: Option<String>,
    /// Exact spreadsheet title, resolved through Drive when no id is set
    pub spreadsheet_name: Option<String>,
    /// Worksheet title; the first worksheet is used when unset
    pub worksheet: Option<String>,
    pub sheets_api_url: String,
    pub drive_api_url: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

/// Conversation flow options
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ConversationConfig {
    /// Accept "сегодня" as the current date
    pub allow_today_keyword: bool,
    /// Offer a back button that returns to the previous step
    pub allow_back_navigation: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when unset
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = Self::builder()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(Self::environment());
        Self::with_bare_env_overrides(settings)?.build()?.try_deserialize()
    }

    /// Load settings from an explicit configuration file, still honouring the environment
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::builder()?
            .add_source(config::File::new(path, config::FileFormat::Toml))
            .add_source(Self::environment());
        Self::with_bare_env_overrides(settings)?.build()?.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::LedgerBuddyError> {
        super::validation::validate_settings(self)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        let defaults = Settings::default();
        config::Config::builder()
            .set_default("bot.token", defaults.bot.token)?
            .set_default("sheets.sheets_api_url", defaults.sheets.sheets_api_url)?
            .set_default("sheets.drive_api_url", defaults.sheets.drive_api_url)?
            .set_default("sheets.timeout_seconds", defaults.sheets.timeout_seconds)?
            .set_default("sheets.max_retries", defaults.sheets.max_retries)?
            .set_default("sheets.retry_backoff_ms", defaults.sheets.retry_backoff_ms)?
            .set_default("conversation.allow_today_keyword", defaults.conversation.allow_today_keyword)?
            .set_default("conversation.allow_back_navigation", defaults.conversation.allow_back_navigation)?
            .set_default("logging.level", defaults.logging.level)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("LEDGERBUDDY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// The plain variable names used by existing deployments take precedence
    fn with_bare_env_overrides(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        builder
            .set_override_option("bot.token", std::env::var("BOT_TOKEN").ok())?
            .set_override_option("sheets.spreadsheet_name", std::env::var("SPREADSHEET_NAME").ok())?
            .set_override_option("sheets.spreadsheet_id", std::env::var("SPREADSHEET_ID").ok())?
            .set_override_option("sheets.credentials_json", std::env::var("GOOGLE_CREDENTIALS_JSON").ok())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
            },
            sheets: SheetsConfig {
                credentials_json: None,
                credentials_path: None,
                spreadsheet_id: None,
                spreadsheet_name: None,
                worksheet: None,
                sheets_api_url: "https://sheets.googleapis.com/v4".to_string(),
                drive_api_url: "https://www.googleapis.com/drive/v3".to_string(),
                timeout_seconds: 30,
                max_retries: 3,
                retry_backoff_ms: 500,
            },
            conversation: ConversationConfig {
                allow_today_keyword: true,
                allow_back_navigation: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}
