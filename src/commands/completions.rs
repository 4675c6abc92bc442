use anyhow::{bail, Result};
use clap::{ArgMatches, Command};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh", "fish", "powershell", "elvish"];

/// Generate shell completions for the specified shell
pub fn execute(matches: &ArgMatches, cli: &mut Command) -> Result<()> {
    let Some(shell_str) = matches.get_one::<String>("shell") else {
        bail!("Usage: loadimpact completions <SHELL>");
    };
    write_completions(shell_str, cli, &mut io::stdout())
}

pub fn write_completions(shell_str: &str, cli: &mut Command, out: &mut dyn Write) -> Result<()> {
    let shell = match shell_str.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "powershell" => Shell::PowerShell,
        "elvish" => Shell::Elvish,
        _ => bail!(
            "Unsupported shell: {} (supported: {})",
            shell_str,
            SUPPORTED_SHELLS.join(", ")
        ),
    };

    generate(shell, cli, "loadimpact", out);
    Ok(())
}
