// Command line definition, shared by the binary and shell completions

use crate::commands::completions::SUPPORTED_SHELLS;
use crate::core::metrics::WellKnownMetric;
use crate::core::result_types::ResultType;
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn project_arg(help: &'static str) -> Arg {
    Arg::new("project_id")
        .long("project_id")
        .value_name("ID")
        .help(help)
        .value_parser(value_parser!(u64))
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .value_parser(value_parser!(u64))
}

fn file_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .value_parser(value_parser!(PathBuf))
}

fn csv_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .help("CSV file delimiter")
                .default_value("double"),
        )
        .arg(
            Arg::new("separator")
                .long("separator")
                .help("CSV file separator")
                .default_value("comma"),
        )
        .arg(
            Arg::new("fromline")
                .long("fromline")
                .help("CSV file read from line")
                .value_parser(value_parser!(u32))
                .default_value("1"),
        )
}

pub fn build_cli() -> Command {
    Command::new("loadimpact")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command line client for the Load Impact platform")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("organization")
                .about("Organizations the user is a member of")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("list").about("List organizations that the user is a member of"))
                .subcommand(
                    Command::new("projects")
                        .about("List the projects of an organization")
                        .arg(id_arg("organization_id", "Id of the organization")),
                ),
        )
        .subcommand(
            Command::new("user-scenario")
                .about("Manage user scenarios")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("get")
                        .about("Get user-scenario")
                        .arg(id_arg("id", "Id of the user scenario")),
                )
                .subcommand(
                    Command::new("list")
                        .about("List user-scenarios")
                        .arg(project_arg("Id of the project to list scenarios from")),
                )
                .subcommand(
                    Command::new("create")
                        .about("Create user-scenario")
                        .arg(file_arg("script_file", "File holding the scenario script"))
                        .arg(Arg::new("name").help("Name of the scenario").required(true))
                        .arg(project_arg("Id of the project the scenario should be in"))
                        .arg(
                            Arg::new("datastore_file")
                                .long("datastore_file")
                                .value_name("FILE")
                                .help("CSV file to upload as a new data store for the scenario (repeatable)")
                                .action(ArgAction::Append)
                                .value_parser(value_parser!(PathBuf)),
                        )
                        .arg(
                            Arg::new("datastore_id")
                                .long("datastore_id")
                                .value_name("ID")
                                .help("Existing data store to link to the scenario (repeatable)")
                                .action(ArgAction::Append)
                                .value_parser(value_parser!(u64)),
                        ),
                )
                .subcommand(
                    Command::new("update")
                        .about("Update user-scenario script")
                        .arg(id_arg("id", "Id of the user scenario"))
                        .arg(file_arg("script_file", "File holding the new script")),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete user-scenario")
                        .arg(id_arg("id", "Id of the user scenario"))
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .help("Confirm the action without prompting")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("validate")
                        .about("Validate user-scenario script")
                        .arg(id_arg("id", "Id of the user scenario")),
                ),
        )
        .subcommand(
            Command::new("data-store")
                .about("Manage CSV data stores")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("list")
                        .about("List data stores")
                        .arg(project_arg("Id of the project to list data stores from")),
                )
                .subcommand(
                    Command::new("download")
                        .about("Download a data store CSV")
                        .arg(id_arg("id", "Id of the data store"))
                        .arg(
                            Arg::new("file_name")
                                .long("file_name")
                                .value_name("PATH")
                                .help("File to save the downloaded CSV in (default: <id>.csv)")
                                .value_parser(value_parser!(PathBuf)),
                        ),
                )
                .subcommand(csv_args(
                    Command::new("create")
                        .about("Create data store")
                        .arg(Arg::new("name").help("Name of the data store").required(true))
                        .arg(file_arg("datastore_file", "CSV file to upload"))
                        .arg(project_arg("Id of the project to create the data store in")),
                ))
                .subcommand(csv_args(
                    Command::new("update")
                        .about("Update data store")
                        .arg(id_arg("id", "Id of the data store"))
                        .arg(file_arg("datastore_file", "CSV file to upload"))
                        .arg(
                            Arg::new("name")
                                .long("name")
                                .help("New name (keeps the current one by default)"),
                        )
                        .arg(project_arg("Project id of the data store")),
                )),
        )
        .subcommand(
            Command::new("test")
                .about("List and run tests")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("list").about("List tests").arg(
                        project_arg("Id of the project to list tests from (repeatable)")
                            .action(ArgAction::Append),
                    ),
                )
                .subcommand(
                    Command::new("run")
                        .about("Run a test and stream its metrics")
                        .arg(id_arg("test_id", "Id of the test to run"))
                        .arg(
                            Arg::new("quiet")
                                .long("quiet")
                                .help("Only print the test run id")
                                .action(ArgAction::SetTrue)
                                .overrides_with("no_quiet"),
                        )
                        .arg(
                            Arg::new("no_quiet")
                                .long("no-quiet")
                                .help("Stream metrics while the test runs (default)")
                                .action(ArgAction::SetTrue)
                                .overrides_with("quiet"),
                        )
                        .arg(
                            Arg::new("metric")
                                .long("metric")
                                .value_name("NAME")
                                .help("Metric to stream (repeatable)")
                                .action(ArgAction::Append)
                                .value_parser(WellKnownMetric::param_names()),
                        )
                        .arg(
                            Arg::new("raw_metric")
                                .long("raw_metric")
                                .value_name("ID")
                                .help("Raw metric identifier to stream, e.g. __li_url_<hash>:1:200:GET (repeatable)")
                                .action(ArgAction::Append),
                        )
                        .arg(
                            Arg::new("full_width")
                                .long("full_width")
                                .help("Do not truncate columns, separate them with tabs")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("no_ignore_errors")
                                .long("no-ignore-errors")
                                .help("Stop streaming when fetching results fails")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("metric")
                .about("Inspect test run metrics")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("list")
                        .about("List metrics for a test run")
                        .arg(id_arg("test_run_id", "Id of the test run"))
                        .arg(
                            Arg::new("type")
                                .short('t')
                                .long("type")
                                .help("Metric type to include on the list (repeatable)")
                                .action(ArgAction::Append)
                                .value_parser(ResultType::names()),
                        ),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .value_parser(SUPPORTED_SHELLS.to_vec()),
                ),
        )
}
