use super::{project_id, tab_row, MISSING_PROJECT_MESSAGE};
use crate::api::models::{DataStoreUpload, NewUserScenario, ValidationResult};
use crate::api::AccountApi;
use crate::core::Session;
use crate::ui::formatters::format_timestamp;
use crate::ui::prompts::confirm;
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const VALIDATION_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub fn execute(matches: &ArgMatches, session: &Session) -> Result<()> {
    match matches.subcommand() {
        Some(("get", sub_matches)) => get_scenario(session, scenario_id(sub_matches)?),
        Some(("list", sub_matches)) => list_scenarios(sub_matches, session),
        Some(("create", sub_matches)) => create_scenario(sub_matches, session),
        Some(("update", sub_matches)) => update_scenario(sub_matches, session),
        Some(("delete", sub_matches)) => delete_scenario(sub_matches, session),
        Some(("validate", sub_matches)) => validate_scenario(session, scenario_id(sub_matches)?),
        _ => {
            println!("Use 'loadimpact user-scenario --help' for more information.");
            Ok(())
        }
    }
}

fn scenario_id(matches: &ArgMatches) -> Result<u64> {
    matches
        .get_one::<u64>("id")
        .copied()
        .context("user scenario id is required")
}

fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read script file: {:?}", path))
}

fn get_scenario(session: &Session, id: u64) -> Result<()> {
    let scenario = session.client().get_user_scenario(id)?;
    println!("{}", scenario.script);
    Ok(())
}

fn list_scenarios(matches: &ArgMatches, session: &Session) -> Result<()> {
    write_scenarios(
        session.client(),
        project_id(matches, session),
        &mut io::stdout().lock(),
    )
}

/// `ID:\tNAME:` table of a project's scenarios
pub fn write_scenarios<A: AccountApi + ?Sized, W: Write>(
    api: &A,
    project_id: Option<u64>,
    out: &mut W,
) -> Result<()> {
    let Some(project_id) = project_id else {
        writeln!(out, "{}", MISSING_PROJECT_MESSAGE)?;
        return Ok(());
    };

    let scenarios = api.list_user_scenarios(project_id)?;
    writeln!(out, "ID:\tNAME:")?;
    for scenario in scenarios {
        writeln!(out, "{}", tab_row(&[scenario.id.to_string(), scenario.name]))?;
    }
    Ok(())
}

fn create_scenario(matches: &ArgMatches, session: &Session) -> Result<()> {
    let Some(project_id) = project_id(matches, session) else {
        println!("{}", MISSING_PROJECT_MESSAGE);
        return Ok(());
    };

    let script_file = matches
        .get_one::<PathBuf>("script_file")
        .context("script file is required")?;
    let name = matches.get_one::<String>("name").context("name is required")?;
    let script = read_script(script_file)?;

    let mut data_store_ids = Vec::new();
    if let Some(files) = matches.get_many::<PathBuf>("datastore_file") {
        for file in files {
            let upload = DataStoreUpload::with_defaults(file_label(file), project_id);
            let data_store = session
                .client()
                .create_data_store(&upload, file)
                .with_context(|| format!("Failed to upload data store {:?}", file))?;
            log::info!("Created data store {} from {:?}", data_store.id, file);
            data_store_ids.push(data_store.id);
        }
    }
    if let Some(ids) = matches.get_many::<u64>("datastore_id") {
        data_store_ids.extend(ids.copied());
    }

    let scenario = session.client().create_user_scenario(&NewUserScenario {
        name: name.clone(),
        script,
        project_id,
        data_store_ids,
    })?;
    println!("{}", scenario.script);
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn update_scenario(matches: &ArgMatches, session: &Session) -> Result<()> {
    let id = scenario_id(matches)?;
    let script_file = matches
        .get_one::<PathBuf>("script_file")
        .context("script file is required")?;
    let script = read_script(script_file)?;

    session.client().update_user_scenario_script(id, &script)?;
    let scenario = session.client().get_user_scenario(id)?;
    println!("{}", scenario.script);
    Ok(())
}

fn delete_scenario(matches: &ArgMatches, session: &Session) -> Result<()> {
    let id = scenario_id(matches)?;

    if !matches.get_flag("yes")
        && !confirm("Are you sure you want to delete the user-scenario?")?
    {
        println!("Aborted!");
        return Ok(());
    }

    session.client().delete_user_scenario(id)?;
    println!("User scenario {} deleted.", id);
    Ok(())
}

fn validate_scenario(session: &Session, id: u64) -> Result<()> {
    let client = session.client();
    let scenario = client.get_user_scenario(id)?;

    let mut validation = client.validate_user_scenario(scenario.id)?;
    while !validation.is_done() {
        log::debug!("Validation {} is {:?}", validation.id, validation.status());
        thread::sleep(VALIDATION_POLL_INTERVAL);
        validation = client.get_user_scenario_validation(validation.id)?;
    }

    let results = client.get_user_scenario_validation_results(validation.id)?;
    for line in format_validation_results(&results) {
        println!("{}", line);
    }
    Ok(())
}

/// `[<level> ][<local time>] <message>` per validation result
pub fn format_validation_results(results: &[ValidationResult]) -> Vec<String> {
    results
        .iter()
        .map(|result| {
            let level = result
                .level
                .as_deref()
                .filter(|level| !level.is_empty())
                .map(|level| format!("{} ", level))
                .unwrap_or_default();
            format!(
                "{}[{}] {}",
                level,
                format_timestamp(&result.timestamp),
                result.message
            )
        })
        .collect()
}
