//! Test helpers module
//!
//! This module provides utilities and helpers for testing the LedgerBuddy application.
//! It includes record sink fakes, a fixed clock, a mock Google API server and
//! Telegram test data.

#![allow(dead_code)]

pub mod google_mock;
pub mod sinks;
pub mod test_data;

pub use google_mock::*;
pub use sinks::*;
pub use test_data::*;

use std::sync::{Arc, Once};
use LedgerBuddy::state::{ConversationEngine, EngineOptions};

static INIT: Once = Once::new();

/// Initialize test logging once per test binary
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Engine with the given options writing to a fresh recording sink, clock fixed at 25.12.2025
pub fn test_engine(options: EngineOptions) -> (Arc<ConversationEngine>, Arc<RecordingSink>) {
    init_test_env();
    let sink = Arc::new(RecordingSink::default());
    let engine = ConversationEngine::new(options, sink.clone())
        .with_clock(Arc::new(FixedClock::christmas()));
    (Arc::new(engine), sink)
}
