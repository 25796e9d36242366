//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{LedgerBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_sheets_config(&settings.sheets)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.trim().is_empty() {
        return Err(LedgerBuddyError::Config(
            "Bot token is required (BOT_TOKEN)".to_string()
        ));
    }

    Ok(())
}

/// Validate Google Sheets configuration
fn validate_sheets_config(config: &super::SheetsConfig) -> Result<()> {
    let has_inline = config.credentials_json.as_deref().is_some_and(|s| !s.trim().is_empty());
    let has_path = config.credentials_path.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !has_inline && !has_path {
        return Err(LedgerBuddyError::Config(
            "Google service account credentials are required (GOOGLE_CREDENTIALS_JSON or sheets.credentials_path)".to_string()
        ));
    }

    let has_id = config.spreadsheet_id.as_deref().is_some_and(|s| !s.trim().is_empty());
    let has_name = config.spreadsheet_name.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !has_id && !has_name {
        return Err(LedgerBuddyError::Config(
            "Spreadsheet id or name is required (SPREADSHEET_ID or SPREADSHEET_NAME)".to_string()
        ));
    }

    if config.sheets_api_url.is_empty() || config.drive_api_url.is_empty() {
        return Err(LedgerBuddyError::Config(
            "Google API URLs must not be empty".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(LedgerBuddyError::Config(
            "Sheets timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(LedgerBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(LedgerBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
