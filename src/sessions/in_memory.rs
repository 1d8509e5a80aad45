//! In-memory session store implementation.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::traits::{Session, SessionStore};
use crate::conversation::ConversationMessage;

/// An in-memory session store backed by a mutex-protected hash map.
///
/// The single map lock is held only for the duration of each operation, so
/// distinct sessions proceed concurrently while same-session appends are
/// serialized.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    max_message_pairs: usize,
}

impl InMemorySessionStore {
    /// Create a store that keeps at most `max_message_pairs` pairs per session.
    pub fn new(max_message_pairs: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_message_pairs: max_message_pairs.max(1),
        }
    }

    /// Drop oldest pairs until the history fits the bound again.
    fn enforce_bound(history: &mut Vec<ConversationMessage>, max_pairs: usize) {
        while history.len() > max_pairs * 2 {
            history.drain(..2);
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str, user_id: &str) -> Result<Session> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id, user_id));
        Ok(session.clone())
    }

    async fn append(&self, session_id: &str, message: ConversationMessage) -> Result<()> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id, ""));
        session.history.push(message);
        session.last_activity = Utc::now();
        Self::enforce_bound(&mut session.history, self.max_message_pairs);
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<ConversationMessage>> {
        let sessions = self.sessions.lock();
        Ok(sessions
            .get(session_id)
            .map(|s| s.history.clone())
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}
