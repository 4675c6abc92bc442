//! Starting a test run and following it to completion

use crate::api::models::TestRun;
use crate::api::RunApi;
use crate::core::metrics::{resolve_metrics, Metric};
use crate::core::stream::{CancelToken, StreamDriver, StreamState, TIMESTAMP_HEADER};
use crate::error::Result;
use crate::ui::columns::ColumnFormatter;
use crate::ui::prompts::CONNECTION_FAILURE_MESSAGE;
use std::io::Write;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Exit code used when the platform cannot be reached
pub const EXIT_CONNECTION_FAILURE: i32 = 1;

/// Prefix of the last line of a streamed run
pub const STATUS_LABEL: &str = "TEST_RUN_STATUS:";

/// Width of a rendered `YYYY-MM-DD HH:MM:SS` timestamp
const TIMESTAMP_WIDTH: usize = 19;
const MIN_METRIC_WIDTH: usize = 10;
const COLUMN_SEPARATOR: &str = " ";
const FULL_WIDTH_SEPARATOR: &str = "\t";

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Skip streaming and only print the run id
    pub quiet: bool,
    /// Catalog parameter names from `--metric`
    pub metrics: Vec<String>,
    /// Arbitrary identifiers from `--raw_metric`
    pub raw_metrics: Vec<String>,
    pub full_width: bool,
    /// Skip failed result polls instead of stopping the stream
    pub ignore_errors: bool,
    pub poll_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            metrics: Vec::new(),
            raw_metrics: Vec::new(),
            full_width: false,
            ignore_errors: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RunOptions {
    /// Metrics to stream, sorted, with the default set when none was given
    pub fn resolved_metrics(&self) -> Vec<Metric> {
        let selectors: Vec<&str> = self
            .metrics
            .iter()
            .chain(self.raw_metrics.iter())
            .map(String::as_str)
            .collect();
        resolve_metrics(&selectors)
    }
}

/// Formatter for the streamed table: timestamp first, then one column per metric
pub fn column_formatter(metrics: &[Metric], full_width: bool) -> ColumnFormatter {
    if full_width {
        return ColumnFormatter::pass_through(metrics.len() + 1, FULL_WIDTH_SEPARATOR);
    }

    let mut widths = vec![TIMESTAMP_WIDTH.max(TIMESTAMP_HEADER.width())];
    widths.extend(
        metrics
            .iter()
            .map(|m| m.to_display_form(true).width().max(MIN_METRIC_WIDTH)),
    );
    ColumnFormatter::new(widths, COLUMN_SEPARATOR)
}

/// Runs a test and maps its outcome to a process exit code
pub struct RunController<'a, A: RunApi + ?Sized, W: Write> {
    api: &'a A,
    out: W,
    cancel: CancelToken,
}

impl<'a, A: RunApi + ?Sized, W: Write> RunController<'a, A, W> {
    pub fn new(api: &'a A, out: W, cancel: CancelToken) -> Self {
        Self { api, out, cancel }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Start the test, optionally stream its metrics, and return the exit code.
    ///
    /// Connectivity failures are reported on the output and turned into
    /// [`EXIT_CONNECTION_FAILURE`]; other errors are returned.
    pub fn run(&mut self, test_id: u64, options: &RunOptions) -> Result<i32> {
        match self.start_and_follow(test_id, options) {
            Err(err) if err.is_connection() => {
                log::debug!("Connection failure: {}", err);
                writeln!(self.out, "{}", CONNECTION_FAILURE_MESSAGE)?;
                Ok(EXIT_CONNECTION_FAILURE)
            }
            other => other,
        }
    }

    fn start_and_follow(&mut self, test_id: u64, options: &RunOptions) -> Result<i32> {
        let run = self.api.start_test_run(test_id)?;
        writeln!(self.out, "TEST_RUN_ID:\t{}", run.id)?;
        self.out.flush()?;

        if !options.quiet {
            let state = self.stream(&run, options)?;
            log::debug!("Result stream for test run {} ended as {:?}", run.id, state);
        }

        let status = self.api.test_run_status(&run)?;
        log::debug!("Test run {} final status: {}", run.id, status);
        if !options.quiet {
            writeln!(self.out, "{}\t{}", STATUS_LABEL, status.styled())?;
        }
        Ok(status.exit_code())
    }

    fn stream(&mut self, run: &TestRun, options: &RunOptions) -> Result<StreamState> {
        let api = self.api;
        let metrics = options.resolved_metrics();
        let formatter = column_formatter(&metrics, options.full_width);
        let ids: Vec<String> = metrics.iter().map(|m| m.to_wire_form(true)).collect();

        let stream = api.result_stream(run, &ids, options.poll_interval, !options.ignore_errors)?;
        let mut driver = StreamDriver::new(metrics, formatter, &mut self.out, self.cancel.clone());
        driver.run(stream, || api.abort_test_run(run))
    }
}
