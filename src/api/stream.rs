// Polling result stream for a running test

use super::models::{Sample, SampleBatch, TestRunResult};
use crate::core::status::RunStatus;
use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

/// Raw polling primitives the stream is built on
pub trait ResultSource {
    fn fetch_results(&self, test_run_id: u64, metric_ids: &[String]) -> Result<Vec<TestRunResult>>;

    fn run_status(&self, test_run_id: u64) -> Result<RunStatus>;
}

/// Iterator over sample batches of one test run.
///
/// Each call to `next` (after the first) sleeps for the poll interval, then
/// fetches the latest points and keeps, per metric id, the newest one not
/// yet yielded. The stream ends after the poll that observes a terminal run
/// status, or after yielding an error.
pub struct PolledResultStream<'a, S: ResultSource + ?Sized> {
    source: &'a S,
    test_run_id: u64,
    metric_ids: Vec<String>,
    poll_interval: Duration,
    raise_on_upstream_error: bool,
    last_seen: HashMap<String, DateTime<Utc>>,
    polls: u64,
    done: bool,
}

impl<'a, S: ResultSource + ?Sized> PolledResultStream<'a, S> {
    pub fn new(
        source: &'a S,
        test_run_id: u64,
        metric_ids: Vec<String>,
        poll_interval: Duration,
        raise_on_upstream_error: bool,
    ) -> Self {
        Self {
            source,
            test_run_id,
            metric_ids,
            poll_interval,
            raise_on_upstream_error,
            last_seen: HashMap::new(),
            polls: 0,
            done: false,
        }
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    fn newest_unseen(&mut self, results: Vec<TestRunResult>) -> SampleBatch {
        let mut batch = SampleBatch::new();

        for result in results {
            let Some(point) = result
                .data
                .iter()
                .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
            else {
                continue;
            };

            let is_new = self
                .last_seen
                .get(&result.id)
                .map_or(true, |seen| point.timestamp > *seen);

            if is_new {
                self.last_seen.insert(result.id.clone(), point.timestamp);
                batch.insert(
                    result.id,
                    Sample {
                        timestamp: point.timestamp,
                        value: point.value,
                    },
                );
            }
        }

        batch
    }

    fn fail(&mut self, err: CliError) -> Option<Result<SampleBatch>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<S: ResultSource + ?Sized> Iterator for PolledResultStream<'_, S> {
    type Item = Result<SampleBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.polls > 0 && !self.poll_interval.is_zero() {
            thread::sleep(self.poll_interval);
        }
        self.polls += 1;

        let batch = match self.source.fetch_results(self.test_run_id, &self.metric_ids) {
            Ok(results) => self.newest_unseen(results),
            Err(err) if err.is_connection() => return self.fail(err),
            Err(err) if self.raise_on_upstream_error => {
                return self.fail(CliError::upstream(err.to_string()))
            }
            Err(err) => {
                log::warn!("Ignoring failed results poll for test run {}: {}", self.test_run_id, err);
                SampleBatch::new()
            }
        };

        match self.source.run_status(self.test_run_id) {
            Ok(status) if status.is_terminal() => {
                log::debug!("Test run {} reached status {}", self.test_run_id, status);
                self.done = true;
            }
            Ok(_) => {}
            Err(err) if err.is_connection() => return self.fail(err),
            Err(err) if self.raise_on_upstream_error => {
                return self.fail(CliError::upstream(err.to_string()))
            }
            Err(err) => {
                log::warn!("Ignoring failed status poll for test run {}: {}", self.test_run_id, err);
            }
        }

        Some(Ok(batch))
    }
}
