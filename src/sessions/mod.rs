//! Session management — per-session bounded conversation history.

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemorySessionStore;
pub use traits::{Session, SessionStore};

/// Create a default in-memory session store with the given pair bound.
pub fn create_session_store(max_message_pairs: usize) -> Box<dyn SessionStore> {
    Box::new(InMemorySessionStore::new(max_message_pairs))
}
