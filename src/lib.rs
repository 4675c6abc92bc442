// Load Impact CLI library - Public API

// Re-export error types
pub mod error;
pub use error::{CliError, Result};

// Module declarations
pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::session::Session;

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
