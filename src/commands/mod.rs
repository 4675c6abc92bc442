// Command handlers module
pub mod completions;
pub mod data_store;
pub mod metric;
pub mod organization;
pub mod user_scenario;

use crate::core::Session;
use clap::ArgMatches;

pub const MISSING_PROJECT_MESSAGE: &str = "You need to provide a project id.";

/// `--project_id` when given, otherwise the configured default project
pub(crate) fn project_id(matches: &ArgMatches, session: &Session) -> Option<u64> {
    session.project_id(matches.get_one::<u64>("project_id").copied())
}

/// Tab-separated line, the format of every listing command
pub(crate) fn tab_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\t")
}
