//! Router configuration schema, loaded from `config.toml`.

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ── Logging toggles ───────────────────────────────────────────────

/// Observability toggles (`[log]`). These gate diagnostic output only and
/// have no behavioral effect on routing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LogConfig {
    /// Log the utterance and reply text of each agent turn.
    pub log_agent_chat: bool,
    /// Log the utterance and history size handed to the classifier.
    pub log_classifier_chat: bool,
    /// Log the classifier's raw result before the selection policy runs.
    pub log_classifier_raw_output: bool,
    /// Log the selected agent and confidence after the selection policy.
    pub log_classifier_output: bool,
    /// Log per-phase execution times for each turn.
    pub log_execution_times: bool,
}

// ── Top-level config ──────────────────────────────────────────────

/// Top-level router configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Additional agent-invocation attempts after the first failure.
    pub max_retries: u32,
    /// Fall back to the registry's default agent when classification
    /// identifies no agent.
    pub use_default_agent_if_none_identified: bool,
    /// History bound, in user/assistant message pairs per session. Must be ≥ 1.
    pub max_message_pairs_per_agent: usize,
    /// Observability toggles (`[log]`).
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_retries: 3,
            use_default_agent_if_none_identified: true,
            max_message_pairs_per_agent: 10,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate a config from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.max_message_pairs_per_agent >= 1,
            "max_message_pairs_per_agent must be at least 1"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_retries, 3);
        assert!(config.use_default_agent_if_none_identified);
        assert_eq!(config.max_message_pairs_per_agent, 10);
        assert!(!config.log.log_agent_chat);
    }

    #[test]
    fn zero_pair_bound_fails_validation() {
        let config = Config {
            max_message_pairs_per_agent: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("max_retries = 1").unwrap();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.max_message_pairs_per_agent, 10);
    }

    #[tokio::test]
    async fn load_round_trips_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "max_retries = 2\n\
             use_default_agent_if_none_identified = false\n\
             max_message_pairs_per_agent = 4\n\n\
             [log]\n\
             log_classifier_output = true\n"
        )
        .unwrap();

        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.max_retries, 2);
        assert!(!config.use_default_agent_if_none_identified);
        assert_eq!(config.max_message_pairs_per_agent, 4);
        assert!(config.log.log_classifier_output);
        assert!(!config.log.log_agent_chat);
    }

    #[tokio::test]
    async fn load_rejects_invalid_bound() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "max_message_pairs_per_agent = 0").unwrap();

        assert!(Config::load(file.path()).await.is_err());
    }
}
