// Core business logic module

pub mod config;
pub mod metrics;
pub mod result_types;
pub mod runner;
pub mod session;
pub mod status;
pub mod stream;
pub mod test_config;

// Re-export commonly used items
pub use config::Config;
pub use metrics::{Metric, MetricKind, WellKnownMetric};
pub use runner::{RunController, RunOptions};
pub use session::Session;
pub use status::RunStatus;
pub use stream::{CancelToken, StreamDriver, StreamState};
