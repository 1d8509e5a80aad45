//! Classifier traits and types for intent-based agent selection.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::ConversationMessage;

/// Outcome of scoring one utterance against the registered agent set.
///
/// `selected_agent` names a registered agent; the router resolves it
/// through the registry. `confidence` is always defined, even when no
/// agent was selected (it then reflects the best candidate score, or 0
/// when there was none). An explicit selection is never overridden by the
/// confidence value alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub selected_agent: Option<String>,
    pub confidence: f32,
}

impl ClassificationResult {
    /// A result with no agent identified and zero confidence.
    pub fn none() -> Self {
        Self {
            selected_agent: None,
            confidence: 0.0,
        }
    }
}

/// Scores the current utterance plus history against the registered agents
/// and selects at most one.
///
/// Implementations are constructed over the registered agent set; the
/// router treats this purely as a capability. Backend unavailability must
/// propagate as an error — the router decides recovery.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        utterance: &str,
        history: &[ConversationMessage],
    ) -> Result<ClassificationResult>;

    /// The name of this classifier implementation.
    fn name(&self) -> &str;
}
