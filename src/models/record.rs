//! Ledger record model

use serde_json::Value;
use crate::utils::errors::{LedgerBuddyError, Result};

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub const ALL: [EntryType; 2] = [EntryType::Income, EntryType::Expense];

    /// Keyboard button text, decorative prefix included
    pub fn button_label(self) -> &'static str {
        match self {
            EntryType::Income => "➕ Доход",
            EntryType::Expense => "➖ Расход",
        }
    }

    /// Value written to the spreadsheet
    pub fn label(self) -> &'static str {
        match self {
            EntryType::Income => "Доход",
            EntryType::Expense => "Расход",
        }
    }

    /// Match a button press exactly
    pub fn from_button(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.button_label() == text)
    }
}

/// Fields collected so far in a conversation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftRecord {
    pub date: Option<String>,
    pub entry_type: Option<EntryType>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub comment: Option<String>,
}

impl DraftRecord {
    /// Whether no field has been collected yet
    pub fn is_empty(&self) -> bool {
        *self == DraftRecord::default()
    }

    /// Turn a complete draft into a record. Fails on the first missing field.
    pub fn finalize(&self, author: &str) -> Result<FinalizedRecord> {
        Ok(FinalizedRecord {
            date: self.date.clone().ok_or(LedgerBuddyError::IncompleteRecord("date"))?,
            author: author.to_string(),
            entry_type: self.entry_type.ok_or(LedgerBuddyError::IncompleteRecord("type"))?,
            amount: self.amount.ok_or(LedgerBuddyError::IncompleteRecord("amount"))?,
            category: self.category.clone().ok_or(LedgerBuddyError::IncompleteRecord("category"))?,
            comment: self.comment.clone().ok_or(LedgerBuddyError::IncompleteRecord("comment"))?,
        })
    }
}

/// Complete record handed to the spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedRecord {
    pub date: String,
    pub author: String,
    pub entry_type: EntryType,
    pub amount: f64,
    pub category: String,
    pub comment: String,
}

impl FinalizedRecord {
    /// Spreadsheet row: date, author, type, amount, category, comment
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.date.as_str()),
            Value::from(self.author.as_str()),
            Value::from(self.entry_type.label()),
            Value::from(self.amount),
            Value::from(self.category.as_str()),
            Value::from(self.comment.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn complete_draft() -> DraftRecord {
        DraftRecord {
            date: Some("01.01.2025".to_string()),
            entry_type: Some(EntryType::Income),
            amount: Some(100.0),
            category: Some("Salary".to_string()),
            comment: Some("-".to_string()),
        }
    }

    #[test]
    fn test_entry_type_buttons() {
        assert_eq!(EntryType::from_button("➕ Доход"), Some(EntryType::Income));
        assert_eq!(EntryType::from_button("➖ Расход"), Some(EntryType::Expense));
        assert_eq!(EntryType::from_button("Доход"), None);
        assert_eq!(EntryType::from_button("➕ Доход "), None);
        assert_eq!(EntryType::Expense.label(), "Расход");
    }

    #[test]
    fn test_finalize_complete_draft() {
        let record = complete_draft().finalize("Иван Петров").unwrap();
        assert_eq!(
            record.to_row(),
            vec![json!("01.01.2025"), json!("Иван Петров"), json!("Доход"), json!(100.0), json!("Salary"), json!("-")]
        );
    }

    #[test]
    fn test_finalize_rejects_missing_fields() {
        let mut draft = complete_draft();
        draft.amount = None;
        assert_matches!(draft.finalize("x"), Err(LedgerBuddyError::IncompleteRecord("amount")));

        let mut draft = complete_draft();
        draft.comment = None;
        assert_matches!(draft.finalize("x"), Err(LedgerBuddyError::IncompleteRecord("comment")));
    }

    #[test]
    fn test_empty_draft() {
        assert!(DraftRecord::default().is_empty());
        assert!(!complete_draft().is_empty());
    }
}
