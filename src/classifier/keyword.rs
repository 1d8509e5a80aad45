//! Keyword-overlap classifier — a rule-based default that needs no model
//! backend.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use super::traits::{ClassificationResult, Classifier};
use crate::agents::AgentRegistry;
use crate::conversation::{ConversationMessage, Role};

const MIN_TOKEN_LEN: usize = 3;

/// Scores each registered agent by keyword overlap between the utterance
/// and the agent's name and description. Confidence is the matched share
/// of utterance tokens; selections below the threshold are reported as
/// "no agent identified" with the best score kept.
pub struct KeywordClassifier {
    registry: Arc<AgentRegistry>,
    threshold: f32,
}

impl KeywordClassifier {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self::with_threshold(registry, 0.1)
    }

    pub fn with_threshold(registry: Arc<AgentRegistry>, threshold: f32) -> Self {
        Self { registry, threshold }
    }

    fn tokenize(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= MIN_TOKEN_LEN)
            .map(|t| t.to_lowercase())
            .collect()
    }

    /// Tokens to score: the utterance, falling back to the most recent user
    /// message when the utterance itself has nothing scoreable.
    fn query_tokens(utterance: &str, history: &[ConversationMessage]) -> HashSet<String> {
        let tokens = Self::tokenize(utterance);
        if !tokens.is_empty() {
            return tokens;
        }
        history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| Self::tokenize(&m.text()))
            .unwrap_or_default()
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(
        &self,
        utterance: &str,
        history: &[ConversationMessage],
    ) -> Result<ClassificationResult> {
        let query = Self::query_tokens(utterance, history);
        if query.is_empty() {
            return Ok(ClassificationResult::none());
        }

        let mut best: Option<(String, f32)> = None;
        for agent in self.registry.all() {
            let vocabulary: HashSet<String> = Self::tokenize(agent.name())
                .into_iter()
                .chain(Self::tokenize(agent.description()))
                .collect();
            let matched = query.iter().filter(|t| vocabulary.contains(*t)).count();
            if matched == 0 {
                continue;
            }
            let score = matched as f32 / query.len() as f32;
            if best.as_ref().map_or(true, |(_, b)| score > *b) {
                best = Some((agent.name().to_string(), score));
            }
        }

        Ok(match best {
            Some((name, score)) if score >= self.threshold => ClassificationResult {
                selected_agent: Some(name),
                confidence: score.min(1.0),
            },
            Some((_, score)) => ClassificationResult {
                selected_agent: None,
                confidence: score.min(1.0),
            },
            None => ClassificationResult::none(),
        })
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{Agent, AgentOutput};

    #[derive(Debug)]
    struct StubAgent {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        async fn process(
            &self,
            _utterance: &str,
            _history: &[ConversationMessage],
        ) -> Result<AgentOutput> {
            Ok(AgentOutput::Complete(ConversationMessage::assistant("ok")))
        }
    }

    fn registry() -> Arc<AgentRegistry> {
        let registry = Arc::new(AgentRegistry::new());
        registry
            .register(Arc::new(StubAgent {
                name: "tech",
                description: "software programming code bugs compilers",
            }))
            .unwrap();
        registry
            .register(Arc::new(StubAgent {
                name: "travel",
                description: "flights hotels vacation itinerary booking",
            }))
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn selects_agent_with_best_overlap() {
        let classifier = KeywordClassifier::new(registry());

        let result = classifier
            .classify("I found bugs in my code", &[])
            .await
            .unwrap();

        assert_eq!(result.selected_agent.as_deref(), Some("tech"));
        assert!(result.confidence > 0.0);
    }

    #[tokio::test]
    async fn no_overlap_yields_none_with_zero_confidence() {
        let classifier = KeywordClassifier::new(registry());

        let result = classifier.classify("what about lunch", &[]).await.unwrap();

        assert!(result.selected_agent.is_none());
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn below_threshold_reports_score_without_selection() {
        let classifier = KeywordClassifier::with_threshold(registry(), 0.9);

        let result = classifier
            .classify("please book flights and also tell me a joke and sing", &[])
            .await
            .unwrap();

        assert!(result.selected_agent.is_none());
        assert!(result.confidence > 0.0);
    }

    #[tokio::test]
    async fn falls_back_to_last_user_message_for_short_utterance() {
        let classifier = KeywordClassifier::new(registry());
        let history = vec![
            ConversationMessage::user("I need hotels and flights"),
            ConversationMessage::assistant("Sure, where to?"),
        ];

        let result = classifier.classify("ok", &history).await.unwrap();

        assert_eq!(result.selected_agent.as_deref(), Some("travel"));
    }

    #[tokio::test]
    async fn classification_is_deterministic() {
        let classifier = KeywordClassifier::new(registry());

        let first = classifier.classify("book a vacation", &[]).await.unwrap();
        let second = classifier.classify("book a vacation", &[]).await.unwrap();

        assert_eq!(first.selected_agent, second.selected_agent);
        assert_eq!(first.confidence, second.confidence);
    }
}
