//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod record;

// Re-export commonly used models
pub use record::{EntryType, DraftRecord, FinalizedRecord};
