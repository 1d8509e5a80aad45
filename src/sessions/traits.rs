//! Session storage traits and types for per-session conversation history.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::ConversationMessage;

/// Per-session conversational state, keyed by session id.
///
/// History is bounded to a configured number of message pairs; the store
/// drops the oldest pair when the bound is exceeded. Sessions live for the
/// process lifetime — there is no eviction of whole sessions in this scope,
/// which is a known resource-growth risk for long-running deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub history: Vec<ConversationMessage>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(session_id: &str, user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            history: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// History length in message pairs (two consecutive messages per pair).
    pub fn pair_count(&self) -> usize {
        self.history.len() / 2
    }
}

/// Storage for per-session conversation history.
///
/// Implementations must be safe under concurrent calls for distinct session
/// ids and must serialize mutations for the same session id so append order
/// stays deterministic.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session by id, creating it lazily on first use.
    /// Returns a snapshot; the store keeps ownership of the live state.
    async fn get_or_create(&self, session_id: &str, user_id: &str) -> Result<Session>;

    /// Append a message, enforcing the pair bound by dropping the oldest
    /// pair on overflow. An unknown session id is itself a create.
    async fn append(&self, session_id: &str, message: ConversationMessage) -> Result<()>;

    /// Current history snapshot for a session; empty if the session is unknown.
    async fn history(&self, session_id: &str) -> Result<Vec<ConversationMessage>>;

    /// The name of this session store implementation.
    fn name(&self) -> &str;
}
