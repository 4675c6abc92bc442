// UI and formatting module

pub mod columns;
pub mod formatters;
pub mod prompts;

// Re-export commonly used items for cleaner imports
pub use columns::ColumnFormatter;
pub use formatters::{format_optional_timestamp, format_size, format_timestamp, format_value};
pub use prompts::{confirm, connection_failure, error, info, prompt_value, success, warn};
