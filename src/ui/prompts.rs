// UI prompts and user interaction module

use colored::Colorize;
use dialoguer::{Confirm, Input};

/// Message printed whenever the platform cannot be reached
pub const CONNECTION_FAILURE_MESSAGE: &str = "Cannot connect to Load Impact API";

/// Ask user for yes/no confirmation, defaulting to "no"
pub fn confirm(message: &str) -> anyhow::Result<bool> {
    let answer = Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(answer)
}

/// Ask the user for a value that has no default
pub fn prompt_value(label: &str) -> anyhow::Result<String> {
    let value: String = Input::new().with_prompt(label).interact_text()?;
    Ok(value.trim().to_string())
}

/// Display a warning message
pub fn warn(message: &str) {
    println!("{}", format!("Warning: {}", message).yellow().bold());
}

/// Display an info message
pub fn info(message: &str) {
    println!("{}", message.cyan());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

/// Display an error message
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Report that the platform could not be reached
pub fn connection_failure() {
    println!("{}", CONNECTION_FAILURE_MESSAGE.red());
}
