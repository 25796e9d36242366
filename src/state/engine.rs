//! Conversation engine
//!
//! Drives the record entry conversation: takes one inbound event for a user,
//! runs the validator of the user's current step, moves the session along and
//! produces exactly one reply. On the last step the finished record is handed
//! to a [`RecordSink`] before the confirmation is produced.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};
use crate::config::ConversationConfig;
use crate::models::FinalizedRecord;
use crate::utils::errors::{InputError, Result};
use crate::utils::helpers::{format_amount, truncate_text};
use crate::utils::logging;
use super::context::ConversationSession;
use super::scenarios::{self, Step, BACK_LABEL, CANCEL_LABEL};
use super::storage::StateStorage;

/// Append-only destination for finished records
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append_row(&self, record: &FinalizedRecord) -> Result<()>;
}

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Behaviour switches for the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub allow_today_keyword: bool,
    pub allow_back_navigation: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            allow_today_keyword: true,
            allow_back_navigation: true,
        }
    }
}

impl From<ConversationConfig> for EngineOptions {
    fn from(config: ConversationConfig) -> Self {
        Self {
            allow_today_keyword: config.allow_today_keyword,
            allow_back_navigation: config.allow_back_navigation,
        }
    }
}

/// Inbound event for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// `/start` or `/add`
    Start,
    /// `/cancel`
    Cancel,
    /// Any other text message, button presses included
    Text(&'a str),
}

/// Reply keyboard to show along with a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardHint {
    /// Remove any reply keyboard
    None,
    /// Cancel button, plus back when enabled
    Cancel { back: bool },
    /// Income/expense buttons above back and cancel
    TypeChoice { back: bool },
}

/// Outbound message for the user
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: KeyboardHint,
}

impl Reply {
    fn new(text: impl Into<String>, keyboard: KeyboardHint) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

const GREETING: &str = "Привет 👋";
const CANCELLED: &str = "Действие отменено";
const NOTHING_TO_CANCEL: &str = "Нечего отменять. Чтобы добавить запись, отправь /add";
const IDLE_HINT: &str = "Чтобы добавить запись, отправь /add";
const SAVE_UNCERTAIN: &str = "⚠️ Таблица не подтвердила сохранение, запись могла попасть в неё. Проверь таблицу, прежде чем добавлять запись заново.";
const SAVE_FAILED: &str = "⚠️ Не удалось сохранить запись. Данные не потеряны: отправь комментарий ещё раз, чтобы повторить, или нажми «❌ Отмена».";

/// Per-user record entry state machine
pub struct ConversationEngine {
    options: EngineOptions,
    storage: StateStorage,
    sink: Arc<dyn RecordSink>,
    clock: Arc<dyn Clock>,
}

impl ConversationEngine {
    /// Create an engine writing to `sink`, using the local clock
    pub fn new(options: EngineOptions, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            options,
            storage: StateStorage::new(),
            sink,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to resolve the "today" keyword
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage(&self) -> &StateStorage {
        &self.storage
    }

    /// Handle one inbound event for `user_id`.
    ///
    /// The user's session stays locked until the reply is ready, storage
    /// append included, so events of one user never interleave.
    pub async fn handle(&self, user_id: i64, author: &str, event: Inbound<'_>) -> Result<Reply> {
        let handle = self.storage.session(user_id).await;
        let mut session = handle.lock().await;
        let before = session.step;

        let reply = match event {
            Inbound::Start => self.start(&mut session),
            Inbound::Cancel => self.cancel(&mut session),
            Inbound::Text(text) if text == CANCEL_LABEL => self.cancel(&mut session),
            Inbound::Text(_) if !session.is_active() => Ok(Reply::new(IDLE_HINT, KeyboardHint::None)),
            Inbound::Text(text) if self.options.allow_back_navigation && text == BACK_LABEL => {
                self.back(&mut session)
            }
            Inbound::Text(text) => self.dispatch(&mut session, author, text).await,
        }?;

        let active = self.storage.set_active(user_id, session.is_active()).await;
        debug!(user_id = user_id, from = %before, to = %session.step, active_sessions = active,
               "Conversation event handled");
        Ok(reply)
    }

    fn start(&self, session: &mut ConversationSession) -> Result<Reply> {
        let restarted = session.is_active();
        session.start();
        logging::log_user_action(session.user_id, "record_started", restarted.then_some("restarted"));

        Ok(Reply::new(
            format!("{}\n{}", GREETING, self.prompt(Step::AwaitingDate)),
            self.keyboard_for(Step::AwaitingDate),
        ))
    }

    fn cancel(&self, session: &mut ConversationSession) -> Result<Reply> {
        if !session.is_active() {
            return Ok(Reply::new(NOTHING_TO_CANCEL, KeyboardHint::None));
        }

        logging::log_user_action(session.user_id, "record_cancelled", Some(session.step.id()));
        session.reset();
        Ok(Reply::new(CANCELLED, KeyboardHint::None))
    }

    fn back(&self, session: &mut ConversationSession) -> Result<Reply> {
        let step = session.go_back()?;
        Ok(self.prompt_reply(step))
    }

    /// Run the current step's validator on `text`
    async fn dispatch(&self, session: &mut ConversationSession, author: &str, text: &str) -> Result<Reply> {
        let step = session.step;
        debug!(user_id = session.user_id, step = %step, input = %truncate_text(text, 64), "Validating input");

        let accepted: std::result::Result<(), InputError> = match step {
            Step::AwaitingDate => scenarios::parse_date(text, self.options.allow_today_keyword, self.clock.today())
                .map(|date| session.draft.date = Some(date)),
            Step::AwaitingType => scenarios::parse_entry_type(text)
                .map(|entry_type| session.draft.entry_type = Some(entry_type)),
            Step::AwaitingAmount => scenarios::parse_amount(text)
                .map(|amount| session.draft.amount = Some(amount)),
            Step::AwaitingCategory => {
                session.draft.category = Some(text.to_string());
                Ok(())
            }
            Step::AwaitingComment => {
                session.draft.comment = Some(text.to_string());
                return self.finish(session, author).await;
            }
            Step::Idle => return Ok(Reply::new(IDLE_HINT, KeyboardHint::None)),
        };

        match accepted {
            Ok(()) => {
                session.advance()?;
                Ok(self.prompt_reply(session.step))
            }
            Err(e) => {
                debug!(user_id = session.user_id, step = %step, error = %e, "Input rejected");
                Ok(Reply::new(e.to_string(), self.keyboard_for(step)))
            }
        }
    }

    /// Persist the record, then confirm. A failed append keeps the draft and the step.
    async fn finish(&self, session: &mut ConversationSession, author: &str) -> Result<Reply> {
        let record = session.draft.finalize(author)?;

        if let Err(e) = self.sink.append_row(&record).await {
            logging::log_error(&e, "append_row");
            if e.is_write_uncertain() {
                // Resending could duplicate the row, so the user checks the sheet instead
                warn!(user_id = session.user_id, "Record may or may not have been appended");
                session.reset();
                return Ok(Reply::new(
                    format!("{}\n\n{}", SAVE_UNCERTAIN, record_details(&record)),
                    KeyboardHint::None,
                ));
            }
            warn!(user_id = session.user_id, "Record kept in session after failed append");
            session.draft.comment = None;
            return Ok(Reply::new(SAVE_FAILED, self.keyboard_for(Step::AwaitingComment)));
        }

        logging::log_record_saved(session.user_id, &record.date, record.entry_type.label(), record.amount);
        session.advance()?;
        session.reset();

        Ok(Reply::new(confirmation(&record), KeyboardHint::None))
    }

    fn prompt(&self, step: Step) -> String {
        match step {
            Step::AwaitingDate if self.options.allow_today_keyword => {
                "Введи дату в формате ДД.ММ.ГГГГ или напиши «сегодня»".to_string()
            }
            Step::AwaitingDate => "Введи дату в формате ДД.ММ.ГГГГ".to_string(),
            Step::AwaitingType => "Выбери тип:".to_string(),
            Step::AwaitingAmount => "Введи сумму:".to_string(),
            Step::AwaitingCategory => "Категория:".to_string(),
            Step::AwaitingComment => "Комментарий (или '-'):".to_string(),
            Step::Idle => IDLE_HINT.to_string(),
        }
    }

    fn prompt_reply(&self, step: Step) -> Reply {
        Reply::new(self.prompt(step), self.keyboard_for(step))
    }

    fn keyboard_for(&self, step: Step) -> KeyboardHint {
        let back = self.options.allow_back_navigation;
        match step {
            Step::Idle => KeyboardHint::None,
            // Back from the first step goes nowhere
            Step::AwaitingDate => KeyboardHint::Cancel { back: false },
            Step::AwaitingType => KeyboardHint::TypeChoice { back },
            _ => KeyboardHint::Cancel { back },
        }
    }
}

fn confirmation(record: &FinalizedRecord) -> String {
    format!("✅ Запись сохранена\n\n{}", record_details(record))
}

fn record_details(record: &FinalizedRecord) -> String {
    format!(
        "📅 Дата: {}\n\
        👤 Автор: {}\n\
        🏷 Тип: {}\n\
        💰 Сумма: {}\n\
        📂 Категория: {}\n\
        💬 Комментарий: {}",
        record.date,
        record.author,
        record.entry_type.label(),
        format_amount(record.amount),
        record.category,
        record.comment,
    )
}
