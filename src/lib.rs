#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::float_cmp,
    clippy::implicit_clone,
    clippy::map_unwrap_or,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::needless_pass_by_value,
    clippy::return_self_not_must_use,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::unnecessary_wraps
)]

pub mod agents;
pub mod classifier;
pub mod config;
pub mod conversation;
pub mod observability;
pub mod routing;
pub mod sessions;
pub mod streaming;

pub use agents::{Agent, AgentOutput, AgentRegistry, Fragment, FragmentStream, RegistryError};
pub use classifier::{ClassificationResult, Classifier, KeywordClassifier};
pub use config::Config;
pub use conversation::{ContentPart, ConversationMessage, Role};
pub use routing::{Orchestrator, OrchestratorBuilder, ResponseMetadata, RouteError, RouteResponse};
pub use sessions::{InMemorySessionStore, Session, SessionStore};
pub use streaming::{normalize, NormalizationError};
