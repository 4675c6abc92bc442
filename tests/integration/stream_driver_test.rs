use super::support::{batch, output_lines, FakeRunApi, Step};
use loadimpact_cli::api::models::{SampleBatch, TestRun};
use loadimpact_cli::api::RunApi;
use loadimpact_cli::core::metrics::Metric;
use loadimpact_cli::core::stream::{ABORT_MESSAGE, HEADER_INTERVAL, TIMESTAMP_HEADER};
use loadimpact_cli::core::{CancelToken, RunStatus, StreamDriver, StreamState};
use loadimpact_cli::ui::ColumnFormatter;
use std::time::Duration;

fn tab_driver(metrics: &[&str], cancel: CancelToken) -> StreamDriver<Vec<u8>> {
    let metrics: Vec<Metric> = metrics.iter().map(|m| Metric::parse(m)).collect();
    let formatter = ColumnFormatter::pass_through(metrics.len() + 1, "\t");
    StreamDriver::new(metrics, formatter, Vec::new(), cancel)
}

fn open(api: &FakeRunApi) -> (TestRun, Vec<String>) {
    let run = api.start_test_run(1).unwrap();
    (run, vec!["__li_clients_active:1".to_string()])
}

#[test]
fn test_header_repeats_every_twenty_rows() {
    let api = FakeRunApi::with_batches(25, RunStatus::Finished);
    let (run, ids) = open(&api);
    let stream = api.result_stream(&run, &ids, Duration::ZERO, false).unwrap();

    let mut driver = tab_driver(&["clients_active"], CancelToken::new());
    let state = driver.run(stream, || api.abort_test_run(&run)).unwrap();

    assert_eq!(state, StreamState::Finished);
    assert_eq!(driver.rows(), 25);

    let lines = output_lines(driver.into_inner());
    assert_eq!(lines.len(), 27);

    let header_positions: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with(TIMESTAMP_HEADER))
        .map(|(i, _)| i)
        .collect();
    // Before row 1 and before row 21
    assert_eq!(header_positions, vec![0, HEADER_INTERVAL + 1]);

    let values: Vec<String> = lines
        .iter()
        .filter(|line| !line.starts_with(TIMESTAMP_HEADER))
        .map(|line| line.rsplit('\t').next().unwrap().to_string())
        .collect();
    let expected: Vec<String> = (0..25).map(|i| i.to_string()).collect();
    assert_eq!(values, expected);
    assert_eq!(api.aborts.get(), 0);
}

#[test]
fn test_interrupt_aborts_once_and_stops_pulling() {
    let cancel = CancelToken::new();
    let api = FakeRunApi::with_batches(10, RunStatus::AbortedUser).interrupt_after(3, cancel.clone());
    let (run, ids) = open(&api);
    let stream = api.result_stream(&run, &ids, Duration::ZERO, false).unwrap();

    let mut driver = tab_driver(&["clients_active"], cancel);
    let state = driver.run(stream, || api.abort_test_run(&run)).unwrap();

    assert_eq!(state, StreamState::Aborted);
    assert_eq!(api.pulls.get(), 3);
    assert_eq!(api.aborts.get(), 1);
    assert_eq!(driver.rows(), 3);

    let lines = output_lines(driver.into_inner());
    assert_eq!(lines.last().map(String::as_str), Some(ABORT_MESSAGE));
}

#[test]
fn test_cancelled_before_first_pull() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let api = FakeRunApi::with_batches(5, RunStatus::AbortedUser);
    let (run, ids) = open(&api);
    let stream = api.result_stream(&run, &ids, Duration::ZERO, false).unwrap();

    let mut driver = tab_driver(&["clients_active"], cancel);
    let state = driver.run(stream, || api.abort_test_run(&run)).unwrap();

    assert_eq!(state, StreamState::Aborted);
    assert_eq!(api.pulls.get(), 0);
    assert_eq!(api.aborts.get(), 1);
    assert_eq!(output_lines(driver.into_inner()), vec![ABORT_MESSAGE.to_string()]);
}

#[test]
fn test_missing_metric_renders_placeholder() {
    let api = FakeRunApi::new(
        vec![Step::Batch(batch(0, &[("__li_bandwidth:1", 512.0)]))],
        RunStatus::Finished,
    );
    let (run, ids) = open(&api);
    let stream = api.result_stream(&run, &ids, Duration::ZERO, false).unwrap();

    let mut driver = tab_driver(&["clients_active"], CancelToken::new());
    driver.run(stream, || api.abort_test_run(&run)).unwrap();

    let lines = output_lines(driver.into_inner());
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("\t-"));
}

#[test]
fn test_ignored_upstream_errors_produce_no_rows() {
    let api = FakeRunApi::new(
        vec![
            Step::UpstreamError,
            Step::Batch(batch(1, &[("__li_clients_active:1", 5.0)])),
            Step::UpstreamError,
        ],
        RunStatus::Finished,
    );
    let (run, ids) = open(&api);
    let stream = api.result_stream(&run, &ids, Duration::ZERO, false).unwrap();

    let mut driver = tab_driver(&["clients_active"], CancelToken::new());
    let state = driver.run(stream, || api.abort_test_run(&run)).unwrap();

    assert_eq!(state, StreamState::Finished);
    assert_eq!(driver.rows(), 1);
    assert_eq!(api.pulls.get(), 3);
}

#[test]
fn test_raised_upstream_error_fails_the_stream() {
    let api = FakeRunApi::new(
        vec![
            Step::Batch(batch(0, &[("__li_clients_active:1", 5.0)])),
            Step::UpstreamError,
            Step::Batch(batch(2, &[("__li_clients_active:1", 6.0)])),
        ],
        RunStatus::Finished,
    );
    let (run, ids) = open(&api);
    let stream = api.result_stream(&run, &ids, Duration::ZERO, true).unwrap();

    let mut driver = tab_driver(&["clients_active"], CancelToken::new());
    let result = driver.run(stream, || api.abort_test_run(&run));

    assert!(result.is_err());
    assert_eq!(driver.state(), StreamState::Failed);
    assert_eq!(api.pulls.get(), 2);
    assert_eq!(driver.rows(), 1);
}

#[test]
fn test_empty_stream_writes_nothing() {
    let api = FakeRunApi::new(vec![Step::Batch(SampleBatch::new())], RunStatus::Finished);
    let (run, ids) = open(&api);
    let stream = api.result_stream(&run, &ids, Duration::ZERO, false).unwrap();

    let mut driver = tab_driver(&["clients_active"], CancelToken::new());
    driver.run(stream, || api.abort_test_run(&run)).unwrap();

    assert_eq!(driver.rows(), 0);
    assert!(driver.into_inner().is_empty());
}
