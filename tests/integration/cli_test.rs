use loadimpact_cli::cli::build_cli;
use loadimpact_cli::commands::test::run_options;

fn run_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["loadimpact", "test", "run", "17"];
    argv.extend_from_slice(args);
    let matches = build_cli().try_get_matches_from(argv).unwrap();
    let (_, test) = matches.subcommand().unwrap();
    let (_, run) = test.subcommand().unwrap();
    run.clone()
}

#[test]
fn test_run_defaults() {
    let matches = run_matches(&[]);
    let options = run_options(&matches);

    assert_eq!(matches.get_one::<u64>("test_id"), Some(&17));
    assert!(!options.quiet);
    assert!(!options.full_width);
    assert!(options.ignore_errors);
    assert!(options.metrics.is_empty());
    assert_eq!(options.resolved_metrics().len(), 5);
}

#[test]
fn test_run_flags() {
    let options = run_options(&run_matches(&[
        "--quiet",
        "--metric",
        "bandwidth",
        "--metric",
        "clients_active",
        "--raw_metric",
        "__li_url_abc:1:200:GET",
        "--full_width",
        "--no-ignore-errors",
    ]));

    assert!(options.quiet);
    assert!(options.full_width);
    assert!(!options.ignore_errors);
    assert_eq!(options.metrics, vec!["bandwidth", "clients_active"]);
    assert_eq!(options.raw_metrics, vec!["__li_url_abc:1:200:GET"]);
}

#[test]
fn test_last_quiet_flag_wins() {
    assert!(!run_options(&run_matches(&["--quiet", "--no-quiet"])).quiet);
    assert!(run_options(&run_matches(&["--no-quiet", "--quiet"])).quiet);
}

#[test]
fn test_unknown_metric_is_rejected() {
    let result = build_cli().try_get_matches_from(["loadimpact", "test", "run", "1", "--metric", "bogus"]);
    assert!(result.is_err());
}

#[test]
fn test_metric_list_types() {
    let matches = build_cli()
        .try_get_matches_from(["loadimpact", "metric", "list", "5", "-t", "url", "--type", "common"])
        .unwrap();
    let (_, metric) = matches.subcommand().unwrap();
    let (_, list) = metric.subcommand().unwrap();
    let types: Vec<&String> = list.get_many::<String>("type").unwrap().collect();
    assert_eq!(types, vec!["url", "common"]);
}

#[test]
fn test_project_ids_repeat_for_test_list() {
    let matches = build_cli()
        .try_get_matches_from(["loadimpact", "test", "list", "--project_id", "1", "--project_id", "2"])
        .unwrap();
    let (_, test) = matches.subcommand().unwrap();
    let (_, list) = test.subcommand().unwrap();
    let ids: Vec<u64> = list.get_many::<u64>("project_id").unwrap().copied().collect();
    assert_eq!(ids, vec![1, 2]);
}
