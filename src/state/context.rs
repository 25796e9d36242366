//! Conversation session
//!
//! This module tracks, for a single user, the current step of the record
//! entry conversation and the fields collected so far.

use chrono::{DateTime, Utc};
use crate::models::DraftRecord;
use crate::utils::errors::{LedgerBuddyError, Result};
use super::scenarios::Step;

/// One user's conversation state
#[derive(Debug, Clone)]
pub struct ConversationSession {
    /// User ID this session belongs to
    pub user_id: i64,
    /// Current step
    pub step: Step,
    /// Fields collected so far
    pub draft: DraftRecord,
    /// When this session was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Create an idle session for a user
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            step: Step::Idle,
            draft: DraftRecord::default(),
            updated_at: Utc::now(),
        }
    }

    /// Start (or restart) record entry with an empty draft
    pub fn start(&mut self) {
        self.draft = DraftRecord::default();
        self.step = Step::AwaitingDate;
        self.updated_at = Utc::now();
    }

    /// Move to another step, rejecting moves the scenario does not allow
    pub fn transition_to(&mut self, step: Step) -> Result<()> {
        if !self.step.allowed_transitions().contains(&step) {
            return Err(LedgerBuddyError::InvalidStateTransition {
                from: self.step.to_string(),
                to: step.to_string(),
            });
        }

        self.step = step;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Accept the current step's input and advance one step
    pub fn advance(&mut self) -> Result<()> {
        if !self.step.is_active() {
            return Err(LedgerBuddyError::InvalidStateTransition {
                from: self.step.to_string(),
                to: self.step.next().to_string(),
            });
        }
        self.transition_to(self.step.next())
    }

    /// Return to the previous step, discarding the field collected there
    pub fn go_back(&mut self) -> Result<Step> {
        let target = self.step.previous();
        match target {
            Step::AwaitingDate => self.draft.date = None,
            Step::AwaitingType => self.draft.entry_type = None,
            Step::AwaitingAmount => self.draft.amount = None,
            Step::AwaitingCategory => self.draft.category = None,
            Step::AwaitingComment | Step::Idle => {}
        }
        self.transition_to(target)?;
        Ok(target)
    }

    /// Clear the draft and return to idle
    pub fn reset(&mut self) {
        self.step = Step::Idle;
        self.draft = DraftRecord::default();
        self.updated_at = Utc::now();
    }

    /// Whether a conversation is in progress
    pub fn is_active(&self) -> bool {
        self.step.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use assert_matches::assert_matches;

    #[test]
    fn test_new_session() {
        let session = ConversationSession::new(123);
        assert_eq!(session.user_id, 123);
        assert_eq!(session.step, Step::Idle);
        assert!(session.draft.is_empty());
    }

    #[test]
    fn test_start_clears_draft() {
        let mut session = ConversationSession::new(123);
        session.start();
        session.draft.date = Some("01.01.2025".to_string());
        session.advance().unwrap();

        session.start();
        assert_eq!(session.step, Step::AwaitingDate);
        assert!(session.draft.is_empty());
    }

    #[test]
    fn test_advance_moves_one_step() {
        let mut session = ConversationSession::new(123);
        session.start();
        session.advance().unwrap();
        assert_eq!(session.step, Step::AwaitingType);
        session.advance().unwrap();
        assert_eq!(session.step, Step::AwaitingAmount);
    }

    #[test]
    fn test_advance_from_idle_fails() {
        let mut session = ConversationSession::new(123);
        assert_matches!(session.advance(), Err(LedgerBuddyError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_skip_is_rejected() {
        let mut session = ConversationSession::new(123);
        session.start();
        assert_matches!(
            session.transition_to(Step::AwaitingCategory),
            Err(LedgerBuddyError::InvalidStateTransition { from, to }) if from == "awaiting_date" && to == "awaiting_category"
        );
        assert_eq!(session.step, Step::AwaitingDate);
    }

    #[test]
    fn test_go_back_discards_field() {
        let mut session = ConversationSession::new(123);
        session.start();
        session.draft.date = Some("01.01.2025".to_string());
        session.advance().unwrap();
        session.draft.entry_type = Some(EntryType::Expense);
        session.advance().unwrap();

        assert_eq!(session.go_back().unwrap(), Step::AwaitingType);
        assert_eq!(session.draft.entry_type, None);
        assert_eq!(session.draft.date.as_deref(), Some("01.01.2025"));

        assert_eq!(session.go_back().unwrap(), Step::AwaitingDate);
        assert_eq!(session.draft.date, None);

        assert_eq!(session.go_back().unwrap(), Step::AwaitingDate);
    }

    #[test]
    fn test_reset() {
        let mut session = ConversationSession::new(123);
        session.start();
        session.draft.category = Some("Food".to_string());
        session.reset();
        assert!(!session.is_active());
        assert!(session.draft.is_empty());
    }
}
