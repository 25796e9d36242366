//! Error handling for LedgerBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for LedgerBuddy application
#[derive(Error, Debug)]
pub enum LedgerBuddyError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Google Sheets error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Incomplete record: missing {0}")]
    IncompleteRecord(&'static str),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for LedgerBuddyError {
    fn from(e: config::ConfigError) -> Self {
        LedgerBuddyError::Config(e.to_string())
    }
}

/// Google Sheets / Drive specific errors
#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("Google API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Token signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// The write may or may not have been applied
    #[error("Append outcome unknown: {0}")]
    WriteUncertain(String),
}

/// Rejected conversational input, carrying the corrective text shown to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Неверный формат даты. Пример: 25.12.2025")]
    InvalidDate,

    #[error("Выбери кнопкой")]
    InvalidEntryType,

    #[error("Введи число")]
    InvalidAmount,
}

/// Result type alias for LedgerBuddy operations
pub type Result<T> = std::result::Result<T, LedgerBuddyError>;

/// Result type alias for Google Sheets operations
pub type SheetsResult<T> = std::result::Result<T, SheetsError>;

impl LedgerBuddyError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            LedgerBuddyError::Telegram(_) => true,
            LedgerBuddyError::Sheets(e) => e.is_transient(),
            LedgerBuddyError::Config(_) => false,
            LedgerBuddyError::InvalidStateTransition { .. } => false,
            LedgerBuddyError::IncompleteRecord(_) => false,
            LedgerBuddyError::Http(_) => true,
            LedgerBuddyError::Io(_) => true,
            LedgerBuddyError::InvalidInput(_) => false,
        }
    }

    /// Whether a storage write failed without telling us if it was applied
    pub fn is_write_uncertain(&self) -> bool {
        matches!(self, LedgerBuddyError::Sheets(SheetsError::WriteUncertain(_)))
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LedgerBuddyError::Config(_) => ErrorSeverity::Critical,
            LedgerBuddyError::IncompleteRecord(_) => ErrorSeverity::Critical,
            LedgerBuddyError::Sheets(SheetsError::AuthenticationFailed(_))
            | LedgerBuddyError::Sheets(SheetsError::InvalidCredentials(_)) => ErrorSeverity::Critical,
            LedgerBuddyError::Telegram(_) => ErrorSeverity::Warning,
            LedgerBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

impl SheetsError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            SheetsError::Api { status, .. } => *status == 429 || *status >= 500,
            SheetsError::RequestFailed(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Whether a non-idempotent request can be sent again without risking a
    /// duplicate: Google refused it outright or it never left the client
    pub fn is_safe_to_resend(&self) -> bool {
        match self {
            SheetsError::Api { status, .. } => *status == 429 || *status == 401,
            SheetsError::RequestFailed(e) => e.is_connect(),
            _ => false,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
