//! State management module
//!
//! This module handles conversation state: the step table, per-user sessions
//! and the engine that drives them.

pub mod context;
pub mod engine;
pub mod scenarios;
pub mod storage;

// Re-export commonly used state components
pub use context::ConversationSession;
pub use engine::{Clock, ConversationEngine, EngineOptions, Inbound, KeyboardHint, RecordSink, Reply, SystemClock};
pub use scenarios::{Step, BACK_LABEL, CANCEL_LABEL, TODAY_KEYWORD};
pub use storage::{SessionHandle, StateStorage};
