use anyhow::Result;
use clap::ArgMatches;
use std::process;

use loadimpact_cli::cli::build_cli;
use loadimpact_cli::commands;
use loadimpact_cli::core::{Config, Session};
use loadimpact_cli::error::is_connection_error;
use loadimpact_cli::ui;

fn main() {
    loadimpact_cli::init_logging();

    let matches = build_cli().get_matches();

    let code = match dispatch(&matches) {
        Ok(code) => code,
        Err(e) if is_connection_error(&e) => {
            log::debug!("{:#}", e);
            ui::connection_failure();
            1
        }
        Err(e) => {
            ui::error(&format!("Error: {:#}", e));
            1
        }
    };

    process::exit(code);
}

fn dispatch(matches: &ArgMatches) -> Result<i32> {
    // Completions need no account, so they run before the session is built
    if let Some(("completions", sub_matches)) = matches.subcommand() {
        commands::completions::execute(sub_matches, &mut build_cli())?;
        return Ok(0);
    }

    let session = Session::from_config(Config::load()?)?;

    match matches.subcommand() {
        Some(("organization", sub_matches)) => commands::organization::execute(sub_matches, &session)?,
        Some(("user-scenario", sub_matches)) => commands::user_scenario::execute(sub_matches, &session)?,
        Some(("data-store", sub_matches)) => commands::data_store::execute(sub_matches, &session)?,
        Some(("test", sub_matches)) => return commands::test::execute(sub_matches, &session),
        Some(("metric", sub_matches)) => commands::metric::execute(sub_matches, &session)?,
        _ => {
            println!("Use 'loadimpact --help' for more information.");
        }
    }

    Ok(0)
}
