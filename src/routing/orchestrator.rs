//! The routing control loop: classify → select → invoke → normalize.

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use super::traits::{ResponseMetadata, RouteError, RouteResponse};
use crate::agents::{Agent, AgentOutput, AgentRegistry, FragmentStream};
use crate::classifier::{Classifier, KeywordClassifier};
use crate::config::Config;
use crate::conversation::ConversationMessage;
use crate::observability::ExecutionTimer;
use crate::sessions::{InMemorySessionStore, SessionStore};
use crate::streaming::fragment_text;

const BASE_BACKOFF_MS: u64 = 50;
const MAX_BACKOFF_MS: u64 = 1_000;

/// The router context object: session store, agent registry, classifier,
/// and config, constructed once and shared by handle.
///
/// One turn is admitted per session at a time. A turn whose reply is still
/// streaming holds the session's admission guard until the stream is
/// drained or dropped, so a newly arrived message for the same session
/// waits instead of interleaving history writes. Admission guards, like
/// sessions, accumulate for the process lifetime.
pub struct Orchestrator {
    sessions: Arc<dyn SessionStore>,
    registry: Arc<AgentRegistry>,
    classifier: Arc<dyn Classifier>,
    config: Config,
    admissions: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Route one inbound utterance to the agent the classifier selects and
    /// return its reply.
    ///
    /// The user message is recorded once classification succeeds; the
    /// assistant message is recorded when the full reply text is known —
    /// immediately for complete replies, after the stream drains for
    /// streamed ones. Failed turns never record an assistant message.
    pub async fn route(
        &self,
        utterance: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<RouteResponse, RouteError> {
        let turn_id = Uuid::new_v4().to_string();
        let log = &self.config.log;

        let guard = self.admission(session_id).lock_owned().await;

        let session = self
            .sessions
            .get_or_create(session_id, user_id)
            .await
            .map_err(RouteError::Session)?;

        // Read-only history copy handed to the classifier, current
        // utterance included. The store is not touched until
        // classification has succeeded.
        let mut history = session.history.clone();
        history.push(ConversationMessage::user(utterance));

        if log.log_classifier_chat {
            tracing::debug!(
                turn_id = %turn_id,
                history_len = history.len(),
                "classifying utterance: {utterance}"
            );
        }

        let timer = ExecutionTimer::start("classify", log.log_execution_times);
        let classification = self
            .classifier
            .classify(utterance, &history)
            .await
            .map_err(RouteError::Classification)?;
        timer.finish();

        if log.log_classifier_raw_output {
            tracing::debug!(turn_id = %turn_id, ?classification, "classifier raw output");
        }

        self.sessions
            .append(session_id, ConversationMessage::user(utterance))
            .await
            .map_err(RouteError::Session)?;

        let agent = self.select_agent(&classification.selected_agent)?;

        if log.log_classifier_output {
            tracing::info!(
                turn_id = %turn_id,
                agent = agent.name(),
                confidence = classification.confidence,
                "agent selected"
            );
        }

        let timer = ExecutionTimer::start("invoke", log.log_execution_times);
        let output = self
            .invoke_with_retries(agent.as_ref(), utterance, &session.history)
            .await?;
        timer.finish();

        let metadata = ResponseMetadata {
            agent_name: agent.name().to_string(),
            turn_id,
        };

        let output = match output {
            AgentOutput::Complete(message) => {
                if log.log_agent_chat {
                    tracing::debug!(agent = agent.name(), "reply: {}", message.text());
                }
                self.sessions
                    .append(session_id, message.clone())
                    .await
                    .map_err(RouteError::Session)?;
                AgentOutput::Complete(message)
            }
            AgentOutput::Stream(fragments) => {
                if log.log_agent_chat {
                    tracing::debug!(agent = agent.name(), "reply: <streaming>");
                }
                AgentOutput::Stream(self.record_stream(session_id, fragments, guard))
            }
        };

        Ok(RouteResponse { metadata, output })
    }

    /// Selection policy: an explicit classifier selection wins; otherwise
    /// the configured default fallback; otherwise the turn fails.
    fn select_agent(
        &self,
        selected: &Option<String>,
    ) -> Result<Arc<dyn Agent>, RouteError> {
        match selected {
            Some(name) => Ok(self.registry.resolve(name)?),
            None if self.config.use_default_agent_if_none_identified => self
                .registry
                .default_agent()
                .ok_or(RouteError::NoAgentSelected),
            None => Err(RouteError::NoAgentSelected),
        }
    }

    /// Invoke the agent, retrying transient failures up to the configured
    /// number of extra attempts with a short bounded backoff.
    async fn invoke_with_retries(
        &self,
        agent: &dyn Agent,
        utterance: &str,
        history: &[ConversationMessage],
    ) -> Result<AgentOutput, RouteError> {
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match agent.process(utterance, history).await {
                Ok(output) => return Ok(output),
                Err(source) if attempt >= max_attempts => {
                    return Err(RouteError::AgentInvocation {
                        agent: agent.name().to_string(),
                        attempts: attempt,
                        source,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        agent = agent.name(),
                        attempt,
                        "agent invocation failed, retrying: {err:#}"
                    );
                    tokio::time::sleep(Self::backoff(attempt)).await;
                }
            }
        }
    }

    fn backoff(attempt: u32) -> Duration {
        let exp = BASE_BACKOFF_MS.saturating_mul(1 << (attempt - 1).min(5));
        let jitter = rand::thread_rng().gen_range(0..=25);
        Duration::from_millis(exp.min(MAX_BACKOFF_MS) + jitter)
    }

    /// Wrap an agent's fragment stream so fragments pass through in
    /// production order while their extracted text accumulates; once the
    /// stream finishes, the concatenated text is recorded as the turn's
    /// assistant message. The admission guard travels with the stream and
    /// releases when it is drained or dropped.
    fn record_stream(
        &self,
        session_id: &str,
        inner: FragmentStream,
        guard: OwnedMutexGuard<()>,
    ) -> FragmentStream {
        struct RecordState {
            inner: FragmentStream,
            accumulated: String,
            sessions: Arc<dyn SessionStore>,
            session_id: String,
            _guard: OwnedMutexGuard<()>,
        }

        let state = RecordState {
            inner,
            accumulated: String::new(),
            sessions: Arc::clone(&self.sessions),
            session_id: session_id.to_string(),
            _guard: guard,
        };

        stream::unfold(state, |mut state| async move {
            match state.inner.next().await {
                Some(fragment) => {
                    // Malformed fragments are skipped here without logging;
                    // the normalization layer owns that warning.
                    if let Ok(text) = fragment_text(&fragment) {
                        state.accumulated.push_str(&text);
                    }
                    Some((fragment, state))
                }
                None => {
                    let reply = ConversationMessage::assistant(state.accumulated.clone());
                    if let Err(err) = state.sessions.append(&state.session_id, reply).await {
                        tracing::warn!(
                            session_id = %state.session_id,
                            "failed to record streamed reply: {err:#}"
                        );
                    }
                    None
                }
            }
        })
        .boxed()
    }

    fn admission(&self, session_id: &str) -> Arc<AsyncMutex<()>> {
        let mut admissions = self.admissions.lock();
        admissions
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }
}

/// Builder for [`Orchestrator`]. Unset collaborators fall back to the
/// in-memory session store and the keyword classifier.
pub struct OrchestratorBuilder {
    sessions: Option<Arc<dyn SessionStore>>,
    registry: Arc<AgentRegistry>,
    classifier: Option<Arc<dyn Classifier>>,
    config: Config,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            sessions: None,
            registry: Arc::new(AgentRegistry::new()),
            classifier: None,
            config: Config::default(),
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn registry(mut self, registry: Arc<AgentRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn build(self) -> Orchestrator {
        let sessions = self.sessions.unwrap_or_else(|| {
            Arc::new(InMemorySessionStore::new(
                self.config.max_message_pairs_per_agent,
            ))
        });
        let classifier = self
            .classifier
            .unwrap_or_else(|| Arc::new(KeywordClassifier::new(Arc::clone(&self.registry))));

        Orchestrator {
            sessions,
            registry: self.registry,
            classifier,
            config: self.config,
            admissions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
