//! Routing types and the per-turn error taxonomy.

use serde::{Deserialize, Serialize};

use crate::agents::{AgentOutput, RegistryError};

/// Metadata describing how a turn was handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Name of the agent that produced the reply.
    pub agent_name: String,
    /// Correlation id tying together this turn's log records.
    pub turn_id: String,
}

/// The value the router returns to the caller for one routed turn.
///
/// The front-end renders `metadata.agent_name` and drains the output
/// through [`crate::streaming::normalize`].
#[derive(Debug)]
pub struct RouteResponse {
    pub metadata: ResponseMetadata,
    pub output: AgentOutput,
}

/// Why a turn failed. A failed turn is never rendered as a zero-length
/// reply; the caller must surface it distinctly.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Classification backend unavailable or errored. Never retried;
    /// nothing is recorded in history.
    #[error("classification failed")]
    Classification(#[source] anyhow::Error),

    /// No agent identified and no fallback configured. The user message
    /// stays in history; no assistant message is recorded.
    #[error("no agent selected for this utterance")]
    NoAgentSelected,

    /// Registry misuse observed at routing time (the classifier named an
    /// agent the registry does not know).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The selected agent failed after exhausting every attempt. No
    /// partial assistant message is recorded.
    #[error("agent '{agent}' failed after {attempts} attempts")]
    AgentInvocation {
        agent: String,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// Session store infrastructure failure.
    #[error("session store failure")]
    Session(#[source] anyhow::Error),
}
