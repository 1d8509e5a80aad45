//! Request routing — the classify-then-route control loop.

pub mod orchestrator;
pub mod traits;

pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use traits::{ResponseMetadata, RouteError, RouteResponse};
