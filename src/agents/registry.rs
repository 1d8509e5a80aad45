//! Agent registry — maps agent names to handler capabilities.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::traits::Agent;

/// Registry misuse errors. Duplicate registration is fatal at setup time;
/// unknown-name resolution is fatal at routing time.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("agent already registered: {0}")]
    DuplicateAgent(String),
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
}

/// Append-mostly registry of handling agents, deduplicated by name, with an
/// optional designated default agent for fallback routing.
pub struct AgentRegistry {
    agents: Mutex<HashMap<String, Arc<dyn Agent>>>,
    default_agent: Mutex<Option<String>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: Mutex::new(HashMap::new()),
            default_agent: Mutex::new(None),
        }
    }

    /// Register an agent under its own name.
    pub fn register(&self, agent: Arc<dyn Agent>) -> Result<(), RegistryError> {
        let name = agent.name().to_string();
        let mut agents = self.agents.lock();
        if agents.contains_key(&name) {
            return Err(RegistryError::DuplicateAgent(name));
        }
        agents.insert(name, agent);
        Ok(())
    }

    /// Resolve a registered agent by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Agent>, RegistryError> {
        let agents = self.agents.lock();
        agents
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownAgent(name.to_string()))
    }

    /// All registered agents, for classifier consumption. Order is not
    /// significant.
    pub fn all(&self) -> Vec<Arc<dyn Agent>> {
        let agents = self.agents.lock();
        agents.values().cloned().collect()
    }

    /// Designate an already-registered agent as the fallback default.
    pub fn set_default(&self, name: &str) -> Result<(), RegistryError> {
        let agents = self.agents.lock();
        if !agents.contains_key(name) {
            return Err(RegistryError::UnknownAgent(name.to_string()));
        }
        *self.default_agent.lock() = Some(name.to_string());
        Ok(())
    }

    /// The designated default agent, if one is set and still registered.
    pub fn default_agent(&self) -> Option<Arc<dyn Agent>> {
        let name = self.default_agent.lock().clone()?;
        self.agents.lock().get(&name).cloned()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentOutput;
    use crate::conversation::ConversationMessage;
    use anyhow::Result;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct StubAgent {
        name: &'static str,
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "stub"
        }

        async fn process(
            &self,
            _utterance: &str,
            _history: &[ConversationMessage],
        ) -> Result<AgentOutput> {
            Ok(AgentOutput::Complete(ConversationMessage::assistant("ok")))
        }
    }

    #[test]
    fn register_and_resolve() {
        let registry = AgentRegistry::new();
        registry.register(Arc::new(StubAgent { name: "tech" })).unwrap();

        let agent = registry.resolve("tech").unwrap();
        assert_eq!(agent.name(), "tech");
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = AgentRegistry::new();
        registry.register(Arc::new(StubAgent { name: "tech" })).unwrap();

        let err = registry.register(Arc::new(StubAgent { name: "tech" })).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateAgent(name) if name == "tech"));
    }

    #[test]
    fn resolve_unknown_fails() {
        let registry = AgentRegistry::new();
        let err = registry.resolve("ghost").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownAgent(name) if name == "ghost"));
    }

    #[test]
    fn all_returns_every_registered_agent() {
        let registry = AgentRegistry::new();
        registry.register(Arc::new(StubAgent { name: "tech" })).unwrap();
        registry.register(Arc::new(StubAgent { name: "travel" })).unwrap();

        let mut names: Vec<String> = registry.all().iter().map(|a| a.name().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["tech", "travel"]);
    }

    #[test]
    fn set_default_requires_registration() {
        let registry = AgentRegistry::new();
        assert!(registry.set_default("ghost").is_err());
        assert!(registry.default_agent().is_none());

        registry.register(Arc::new(StubAgent { name: "general" })).unwrap();
        registry.set_default("general").unwrap();
        assert_eq!(registry.default_agent().unwrap().name(), "general");
    }
}
