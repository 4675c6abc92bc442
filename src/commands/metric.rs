use super::tab_row;
use crate::api::models::TestRunResultIds;
use crate::api::AccountApi;
use crate::core::metrics::Metric;
use crate::core::result_types::{type_code_text, ResultType};
use crate::core::Session;
use anyhow::{Context, Result};
use clap::ArgMatches;

pub fn execute(matches: &ArgMatches, session: &Session) -> Result<()> {
    match matches.subcommand() {
        Some(("list", sub_matches)) => list_metrics(sub_matches, session),
        _ => {
            println!("Use 'loadimpact metric --help' for more information.");
            Ok(())
        }
    }
}

fn list_metrics(matches: &ArgMatches, session: &Session) -> Result<()> {
    let test_run_id = *matches
        .get_one::<u64>("test_run_id")
        .context("test run id is required")?;

    let type_codes: Vec<u8> = matches
        .get_many::<String>("type")
        .map(|names| {
            names
                .filter_map(|name| ResultType::from_name(name))
                .map(ResultType::code)
                .collect()
        })
        .unwrap_or_default();

    let test_run = session.client().get_test_run(test_run_id)?;
    let result_ids = session
        .client()
        .list_test_run_result_ids(test_run.id, &type_codes)?;

    for line in metric_lines(&result_ids) {
        println!("{}", line);
    }
    Ok(())
}

/// Header plus `<name>\t<param>\t<type>` for every listed result id
pub fn metric_lines(result_ids: &[TestRunResultIds]) -> Vec<String> {
    let mut lines = vec![tab_row(&["NAME:", "PARAM:", "TYPE:"])];
    for entry in result_ids {
        let type_text = type_code_text(entry.type_code);
        for raw in entry.ids.keys() {
            let metric = Metric::parse(raw);
            lines.push(tab_row(&[
                metric.to_wire_form(true).as_str(),
                metric.to_param_form(),
                type_text.as_str(),
            ]));
        }
    }
    lines
}
