//! Intent classification — scores an utterance against registered agents.

pub mod keyword;
pub mod traits;

pub use keyword::KeywordClassifier;
pub use traits::{ClassificationResult, Classifier};

use crate::agents::AgentRegistry;
use std::sync::Arc;

/// Create the default keyword classifier over a registry.
pub fn create_classifier(registry: Arc<AgentRegistry>) -> Box<dyn Classifier> {
    Box::new(KeywordClassifier::new(registry))
}
