use super::{project_id, tab_row, MISSING_PROJECT_MESSAGE};
use crate::api::models::{DataStore, DataStoreUpload};
use crate::api::{AccountApi, ApiClient};
use crate::core::Session;
use crate::ui::formatters::format_size;
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const CONVERSION_POLL_INTERVAL: Duration = Duration::from_secs(3);

pub fn execute(matches: &ArgMatches, session: &Session) -> Result<()> {
    match matches.subcommand() {
        Some(("list", sub_matches)) => list_data_stores(sub_matches, session),
        Some(("download", sub_matches)) => download_data_store(sub_matches, session),
        Some(("create", sub_matches)) => create_data_store(sub_matches, session),
        Some(("update", sub_matches)) => update_data_store(sub_matches, session),
        _ => {
            println!("Use 'loadimpact data-store --help' for more information.");
            Ok(())
        }
    }
}

fn list_data_stores(matches: &ArgMatches, session: &Session) -> Result<()> {
    write_data_stores(
        session.client(),
        project_id(matches, session),
        &mut io::stdout().lock(),
    )
}

pub fn write_data_stores<A: AccountApi + ?Sized, W: Write>(
    api: &A,
    project_id: Option<u64>,
    out: &mut W,
) -> Result<()> {
    let Some(project_id) = project_id else {
        writeln!(out, "{}", MISSING_PROJECT_MESSAGE)?;
        return Ok(());
    };

    let data_stores = api.list_data_stores(project_id)?;
    writeln!(out, "ID:\tNAME:")?;
    for data_store in data_stores {
        writeln!(out, "{}", tab_row(&[data_store.id.to_string(), data_store.name]))?;
    }
    Ok(())
}

fn download_data_store(matches: &ArgMatches, session: &Session) -> Result<()> {
    let id = *matches.get_one::<u64>("id").context("data store id is required")?;
    let data_store = session.client().get_data_store(id)?;

    let destination = matches
        .get_one::<PathBuf>("file_name")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(format!("{}.csv", data_store.id)));

    println!("Downloading CSV file, please wait.");
    let bytes = session
        .client()
        .download_data_store(&data_store, &destination)
        .with_context(|| format!("Failed to download data store {}", id))?;
    println!(
        "Finished download. Saved {} to {}",
        format_size(bytes),
        destination.display()
    );
    Ok(())
}

/// Upload settings shared by `create` and `update`
fn upload_from(matches: &ArgMatches, name: String, project_id: u64) -> DataStoreUpload {
    let mut upload = DataStoreUpload::with_defaults(name, project_id);
    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        upload.delimiter = delimiter.clone();
    }
    if let Some(separator) = matches.get_one::<String>("separator") {
        upload.separator = separator.clone();
    }
    if let Some(fromline) = matches.get_one::<u32>("fromline") {
        upload.fromline = *fromline;
    }
    upload
}

fn create_data_store(matches: &ArgMatches, session: &Session) -> Result<()> {
    let Some(project_id) = project_id(matches, session) else {
        println!("{}", MISSING_PROJECT_MESSAGE);
        return Ok(());
    };

    let name = matches.get_one::<String>("name").context("name is required")?;
    let file = matches
        .get_one::<PathBuf>("datastore_file")
        .context("data store file is required")?;

    let upload = upload_from(matches, name.clone(), project_id);
    let data_store = session.client().create_data_store(&upload, file)?;
    report_conversion(session.client(), data_store)
}

fn update_data_store(matches: &ArgMatches, session: &Session) -> Result<()> {
    let Some(project_id) = project_id(matches, session) else {
        println!("{}", MISSING_PROJECT_MESSAGE);
        return Ok(());
    };

    let id = *matches.get_one::<u64>("id").context("data store id is required")?;
    let file = matches
        .get_one::<PathBuf>("datastore_file")
        .context("data store file is required")?;

    let name = match matches.get_one::<String>("name") {
        Some(name) => name.clone(),
        None => session.client().get_data_store(id)?.name,
    };

    let upload = upload_from(matches, name, project_id);
    let data_store = session.client().update_data_store(id, &upload, file)?;
    report_conversion(session.client(), data_store)
}

fn report_conversion(client: &ApiClient, data_store: DataStore) -> Result<()> {
    let data_store = wait_for_conversion(client, data_store, CONVERSION_POLL_INTERVAL)?;
    println!("{}", conversion_message(&data_store));
    Ok(())
}

pub fn conversion_message(data_store: &DataStore) -> String {
    format!(
        "Data store conversion completed with status '{}'",
        data_store.status().text()
    )
}

/// Re-fetch the data store every `interval` until its conversion is done
pub fn wait_for_conversion<A: AccountApi + ?Sized>(
    api: &A,
    mut data_store: DataStore,
    interval: Duration,
) -> Result<DataStore> {
    while !data_store.has_conversion_finished() {
        log::debug!(
            "Data store {} is {}",
            data_store.id,
            data_store.status().text()
        );
        thread::sleep(interval);
        data_store = api.get_data_store(data_store.id)?;
    }
    Ok(data_store)
}
