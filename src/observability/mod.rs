//! Observability helpers — subscriber setup and per-phase timing.

use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging for embedders and demos - respects the RUST_LOG env
/// var, defaults to INFO. Safe to call more than once; later calls lose.
pub fn init() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Wall-clock timer for one routing phase. Logs on finish when enabled;
/// otherwise free of output.
pub struct ExecutionTimer {
    label: &'static str,
    enabled: bool,
    started: Instant,
}

impl ExecutionTimer {
    pub fn start(label: &'static str, enabled: bool) -> Self {
        Self {
            label,
            enabled,
            started: Instant::now(),
        }
    }

    pub fn finish(self) {
        if self.enabled {
            tracing::debug!(
                phase = self.label,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "phase complete"
            );
        }
    }
}
