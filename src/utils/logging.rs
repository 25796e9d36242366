//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the LedgerBuddy application.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{ErrorSeverity, LedgerBuddyError, Result};

/// Initialize logging based on configuration.
///
/// When a log directory is configured, the returned guard must be kept alive
/// for the lifetime of the process so buffered lines reach the file.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| LedgerBuddyError::Config(format!("Invalid log filter: {}", e)))?;

    let stdout_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    let guard = match config.file_path.as_deref().filter(|p| !p.is_empty()) {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "ledgerbuddy.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
                .try_init()
                .map_err(|e| LedgerBuddyError::Config(format!("Logging already initialized: {}", e)))?;
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .try_init()
                .map_err(|e| LedgerBuddyError::Config(format!("Logging already initialized: {}", e)))?;
            None
        }
    };

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log a record that reached the spreadsheet
pub fn log_record_saved(user_id: i64, date: &str, entry_type: &str, amount: f64) {
    info!(
        user_id = user_id,
        date = date,
        entry_type = entry_type,
        amount = amount,
        "Record appended to spreadsheet"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log an application error at the level matching its severity
pub fn log_error(err: &LedgerBuddyError, context: &str) {
    match err.severity() {
        ErrorSeverity::Info => debug!(error = %err, context = context, "Handled error"),
        ErrorSeverity::Warning => warn!(error = %err, context = context, "Handled error"),
        ErrorSeverity::Error => error!(error = %err, context = context, recoverable = err.is_recoverable(), "Error occurred"),
        ErrorSeverity::Critical => error!(error = %err, context = context, severity = %ErrorSeverity::Critical, "Critical error occurred"),
    }
}
