//! Test data helpers
//!
//! Telegram users and settings used across tests.

use teloxide::types::{User, UserId};
use LedgerBuddy::config::Settings;

/// Helper function to create a test Telegram user
pub fn create_test_user(user_id: i64, first_name: &str, last_name: Option<&str>) -> User {
    User {
        id: UserId(user_id as u64),
        is_bot: false,
        first_name: first_name.to_string(),
        last_name: last_name.map(|s| s.to_string()),
        username: None,
        language_code: Some("ru".to_string()),
        is_premium: false,
        added_to_attachment_menu: false,
    }
}

pub fn test_user_id() -> i64 {
    987654321
}

pub fn test_bot_token() -> String {
    "12345:test_token".to_string()
}

/// Service account key PEM used to sign test assertions
pub fn test_private_key() -> &'static str {
    include_str!("../fixtures/test_service_account_key.pem")
}

/// Service account key JSON pointing its token endpoint at `token_uri`
pub fn test_service_account_json(token_uri: &str) -> String {
    serde_json::json!({
        "type": "service_account",
        "project_id": "ledgerbuddy-test",
        "private_key_id": "test-key-id",
        "private_key": test_private_key(),
        "client_email": "ledgerbuddy@ledgerbuddy-test.iam.gserviceaccount.com",
        "token_uri": token_uri,
    })
    .to_string()
}

/// Settings wired to a mock Google server
pub fn test_settings(base_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = test_bot_token();
    settings.sheets.credentials_json = Some(test_service_account_json(&format!("{}/token", base_url)));
    settings.sheets.spreadsheet_name = Some("Семейный бюджет".to_string());
    settings.sheets.sheets_api_url = format!("{}/v4", base_url);
    settings.sheets.drive_api_url = format!("{}/drive/v3", base_url);
    settings.sheets.timeout_seconds = 5;
    settings.sheets.max_retries = 2;
    settings.sheets.retry_backoff_ms = 10;
    settings
}
