//! Agent capability traits and output types.

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::conversation::{ContentPart, ConversationMessage};

/// One incremental piece of a streamed reply.
///
/// Agents may emit raw text or a structured content part carrying a text
/// field; the stream normalizer extracts text from either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Part(ContentPart),
}

/// A finite, pull-based sequence of reply fragments, delivered in
/// production order.
pub type FragmentStream = BoxStream<'static, Fragment>;

/// What an agent produced for one turn: a complete structured message, or
/// an incremental fragment stream.
pub enum AgentOutput {
    Complete(ConversationMessage),
    Stream(FragmentStream),
}

impl std::fmt::Debug for AgentOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentOutput::Complete(msg) => f.debug_tuple("Complete").field(msg).finish(),
            AgentOutput::Stream(_) => f.debug_tuple("Stream").field(&"..").finish(),
        }
    }
}

/// A handling agent: a named capability that accepts an utterance plus
/// history and produces a reply.
///
/// Concrete variants are opaque to the router — it depends only on this
/// trait, never on a concrete type.
#[async_trait]
pub trait Agent: Send + Sync + std::fmt::Debug {
    /// Unique name used for registration and routing.
    fn name(&self) -> &str;

    /// What this agent handles; consumed by classifiers when scoring.
    fn description(&self) -> &str;

    /// Process one utterance in the context of the session history.
    async fn process(
        &self,
        utterance: &str,
        history: &[ConversationMessage],
    ) -> Result<AgentOutput>;
}
