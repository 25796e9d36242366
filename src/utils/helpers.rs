//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::NaiveDate;

/// Day.month.year format used for stored dates
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Format a calendar date the way records store it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format an amount for user display
pub fn format_amount(amount: f64) -> String {
    // f64 Display already drops a trailing ".0"
    amount.to_string()
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
