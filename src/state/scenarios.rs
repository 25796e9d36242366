//! Record entry scenario
//!
//! This module defines the steps of the record entry conversation, the
//! transitions allowed between them and the validator each step runs on
//! user input.

use std::sync::OnceLock;
use chrono::NaiveDate;
use regex::Regex;
use crate::models::EntryType;
use crate::utils::errors::InputError;
use crate::utils::helpers::{format_date, DATE_FORMAT};

/// Reply keyboard button that aborts the conversation
pub const CANCEL_LABEL: &str = "❌ Отмена";
/// Reply keyboard button that returns to the previous step
pub const BACK_LABEL: &str = "⬅️ Назад";
/// Date keyword resolved to the current day
pub const TODAY_KEYWORD: &str = "сегодня";

/// A point in the conversation expecting one specific field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Step {
    #[default]
    Idle,
    AwaitingDate,
    AwaitingType,
    AwaitingAmount,
    AwaitingCategory,
    AwaitingComment,
}

impl Step {
    /// Step identifier used in logs
    pub fn id(self) -> &'static str {
        match self {
            Step::Idle => "idle",
            Step::AwaitingDate => "awaiting_date",
            Step::AwaitingType => "awaiting_type",
            Step::AwaitingAmount => "awaiting_amount",
            Step::AwaitingCategory => "awaiting_category",
            Step::AwaitingComment => "awaiting_comment",
        }
    }

    /// Whether a conversation is in progress
    pub fn is_active(self) -> bool {
        self != Step::Idle
    }

    /// Step reached after this step's input is accepted
    pub fn next(self) -> Step {
        match self {
            Step::Idle => Step::AwaitingDate,
            Step::AwaitingDate => Step::AwaitingType,
            Step::AwaitingType => Step::AwaitingAmount,
            Step::AwaitingAmount => Step::AwaitingCategory,
            Step::AwaitingCategory => Step::AwaitingComment,
            Step::AwaitingComment => Step::Idle,
        }
    }

    /// Step reached by going back. The date step is first, so it stays put.
    pub fn previous(self) -> Step {
        match self {
            Step::Idle => Step::Idle,
            Step::AwaitingDate => Step::AwaitingDate,
            Step::AwaitingType => Step::AwaitingDate,
            Step::AwaitingAmount => Step::AwaitingType,
            Step::AwaitingCategory => Step::AwaitingAmount,
            Step::AwaitingComment => Step::AwaitingCategory,
        }
    }

    /// Every step this step may move to: forward, back, restart and cancel
    pub fn allowed_transitions(self) -> Vec<Step> {
        let mut steps = vec![self.next(), self.previous(), Step::AwaitingDate, Step::Idle];
        steps.dedup();
        steps
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("static date pattern"))
}

/// Validate a date entered as DD.MM.YYYY, or the "today" keyword when allowed.
pub fn parse_date(input: &str, allow_today: bool, today: NaiveDate) -> Result<String, InputError> {
    let input = input.trim();

    if allow_today && input.to_lowercase() == TODAY_KEYWORD {
        return Ok(format_date(today));
    }

    if !date_pattern().is_match(input) {
        return Err(InputError::InvalidDate);
    }

    // Rejects 31.02.2025 and friends
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| InputError::InvalidDate)?;

    Ok(input.to_string())
}

/// Validate a type button press
pub fn parse_entry_type(input: &str) -> Result<EntryType, InputError> {
    EntryType::from_button(input).ok_or(InputError::InvalidEntryType)
}

/// Validate an amount, accepting a comma as decimal separator
pub fn parse_amount(input: &str) -> Result<f64, InputError> {
    let normalized = input.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(InputError::InvalidAmount),
    }
}
