//! Session storage
//!
//! In-memory map from user id to conversation session. Every session sits
//! behind its own async mutex so one user's events are handled strictly in
//! order while different users proceed independently.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use super::context::ConversationSession;

/// Shared, lockable handle to one user's session
pub type SessionHandle = Arc<Mutex<ConversationSession>>;

/// In-memory session storage keyed by user id
#[derive(Clone, Default)]
pub struct StateStorage {
    sessions: Arc<Mutex<HashMap<i64, SessionHandle>>>,
    /// Users with a conversation in progress, as of their last handled event
    active: Arc<Mutex<HashSet<i64>>>,
}

impl StateStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session handle for a user, creating an idle session on first contact.
    /// The map lock is released before the caller locks the session itself.
    pub async fn session(&self, user_id: i64) -> SessionHandle {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| {
                debug!(user_id = user_id, "Creating conversation session");
                Arc::new(Mutex::new(ConversationSession::new(user_id)))
            })
            .clone()
    }

    /// Snapshot of a user's session, if one exists
    pub async fn load_context(&self, user_id: i64) -> Option<ConversationSession> {
        let handle = self.sessions.lock().await.get(&user_id).cloned()?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// Number of known sessions, idle ones included
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Record whether a user's conversation is in progress; returns the active count
    pub async fn set_active(&self, user_id: i64, active: bool) -> usize {
        let mut users = self.active.lock().await;
        if active {
            users.insert(user_id);
        } else {
            users.remove(&user_id);
        }
        users.len()
    }

    /// Number of users with a conversation in progress
    pub async fn active_sessions(&self) -> usize {
        self.active.lock().await.len()
    }
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage").finish_non_exhaustive()
    }
}
