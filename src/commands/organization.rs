use super::tab_row;
use crate::api::AccountApi;
use crate::core::Session;
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::io::{self, Write};

pub fn execute(matches: &ArgMatches, session: &Session) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => write_organizations(session.client(), &mut io::stdout().lock()),
        Some(("projects", sub_matches)) => {
            let organization_id = *sub_matches
                .get_one::<u64>("organization_id")
                .context("organization id is required")?;
            write_projects(session.client(), organization_id, &mut io::stdout().lock())
        }
        _ => {
            println!("Use 'loadimpact organization --help' for more information.");
            Ok(())
        }
    }
}

/// `<id>\t<name>` per organization the token belongs to
pub fn write_organizations<A: AccountApi + ?Sized, W: Write>(api: &A, out: &mut W) -> Result<()> {
    for organization in api.list_organizations()? {
        writeln!(out, "{}", tab_row(&[organization.id.to_string(), organization.name]))?;
    }
    Ok(())
}

pub fn write_projects<A: AccountApi + ?Sized, W: Write>(
    api: &A,
    organization_id: u64,
    out: &mut W,
) -> Result<()> {
    let projects = api
        .list_organization_projects(organization_id)
        .with_context(|| format!("Failed to list projects of organization {}", organization_id))?;

    for project in projects {
        writeln!(out, "{}", tab_row(&[project.id.to_string(), project.name]))?;
    }
    Ok(())
}
