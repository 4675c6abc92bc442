// Scripted stand-ins for the platform, shared by the streaming and command tests

use chrono::{TimeZone, Utc};
use loadimpact_cli::api::models::{
    DataStore, Organization, Project, Sample, SampleBatch, Test, TestRun, UserScenario,
};
use loadimpact_cli::api::{AccountApi, ResultStream, RunApi};
use loadimpact_cli::core::{CancelToken, RunStatus};
use loadimpact_cli::{CliError, Result};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

pub const RUN_ID: u64 = 4242;

#[derive(Clone)]
pub enum Step {
    Batch(SampleBatch),
    UpstreamError,
    ConnectionLost,
}

/// Batch holding one sample per `(wire id, value)` pair, stamped at `second`
pub fn batch(second: u32, values: &[(&str, f64)]) -> SampleBatch {
    let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second % 60).unwrap();
    values
        .iter()
        .map(|(id, value)| {
            (
                id.to_string(),
                Sample {
                    timestamp,
                    value: *value,
                },
            )
        })
        .collect()
}

pub struct FakeRunApi {
    steps: Vec<Step>,
    final_status: RunStatus,
    fail_start: bool,
    reject_abort: bool,
    cancel_after: Option<(usize, CancelToken)>,
    pub starts: Cell<usize>,
    pub pulls: Cell<usize>,
    pub aborts: Cell<usize>,
    pub requested_ids: RefCell<Vec<String>>,
    pub raise_flag: Cell<Option<bool>>,
}

impl FakeRunApi {
    pub fn new(steps: Vec<Step>, final_status: RunStatus) -> Self {
        Self {
            steps,
            final_status,
            fail_start: false,
            reject_abort: false,
            cancel_after: None,
            starts: Cell::new(0),
            pulls: Cell::new(0),
            aborts: Cell::new(0),
            requested_ids: RefCell::new(Vec::new()),
            raise_flag: Cell::new(None),
        }
    }

    /// Batches whose only content is a VU count, one per second
    pub fn with_batches(count: usize, final_status: RunStatus) -> Self {
        let steps = (0..count)
            .map(|i| Step::Batch(batch(i as u32, &[("__li_clients_active:1", i as f64)])))
            .collect();
        Self::new(steps, final_status)
    }

    pub fn unreachable() -> Self {
        Self {
            fail_start: true,
            ..Self::new(Vec::new(), RunStatus::Finished)
        }
    }

    /// Abort answers 409, as for a run that already finished
    pub fn rejecting_abort(mut self) -> Self {
        self.reject_abort = true;
        self
    }

    /// Simulate Ctrl+C right after the `pull`-th batch was handed out
    pub fn interrupt_after(mut self, pull: usize, token: CancelToken) -> Self {
        self.cancel_after = Some((pull, token));
        self
    }
}

impl RunApi for FakeRunApi {
    fn start_test_run(&self, _test_id: u64) -> Result<TestRun> {
        self.starts.set(self.starts.get() + 1);
        if self.fail_start {
            return Err(CliError::connection("connection refused"));
        }
        Ok(TestRun {
            id: RUN_ID,
            status: RunStatus::Created,
            queued: None,
        })
    }

    fn abort_test_run(&self, run: &TestRun) -> Result<()> {
        assert_eq!(run.id, RUN_ID);
        self.aborts.set(self.aborts.get() + 1);
        if self.reject_abort {
            return Err(CliError::Api {
                status: 409,
                message: "Test run already finished".to_string(),
            });
        }
        Ok(())
    }

    fn result_stream<'a>(
        &'a self,
        _run: &TestRun,
        metric_ids: &[String],
        _poll_interval: Duration,
        raise_on_upstream_error: bool,
    ) -> Result<ResultStream<'a>> {
        *self.requested_ids.borrow_mut() = metric_ids.to_vec();
        self.raise_flag.set(Some(raise_on_upstream_error));
        Ok(Box::new(FakeStream {
            api: self,
            index: 0,
            raise: raise_on_upstream_error,
        }))
    }

    fn test_run_status(&self, _run: &TestRun) -> Result<RunStatus> {
        Ok(self.final_status)
    }
}

struct FakeStream<'a> {
    api: &'a FakeRunApi,
    index: usize,
    raise: bool,
}

impl Iterator for FakeStream<'_> {
    type Item = Result<SampleBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.api.steps.get(self.index)?.clone();
        self.index += 1;
        self.api.pulls.set(self.api.pulls.get() + 1);

        if let Some((pull, token)) = &self.api.cancel_after {
            if *pull == self.index {
                token.cancel();
            }
        }

        Some(match step {
            Step::Batch(batch) => Ok(batch),
            Step::UpstreamError if self.raise => Err(CliError::upstream("results unavailable")),
            Step::UpstreamError => Ok(SampleBatch::new()),
            Step::ConnectionLost => Err(CliError::connection("connection reset")),
        })
    }
}

pub fn output_lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Account with `organizations` orgs, each holding `projects` projects of
/// `tests` tests. Ids count up from 1 across the whole account.
pub struct FakeAccount {
    organizations: usize,
    projects: usize,
    tests: usize,
    pub scenarios: Vec<UserScenario>,
    pub data_stores: Vec<DataStore>,
    /// Successive answers of `get_data_store`
    pub data_store_polls: RefCell<VecDeque<DataStore>>,
    pub organization_calls: Cell<usize>,
    pub project_calls: Cell<usize>,
    pub test_calls: RefCell<Vec<u64>>,
    pub test_run_calls: Cell<usize>,
    pub data_store_calls: Cell<usize>,
}

impl FakeAccount {
    pub fn new(organizations: usize, projects: usize, tests: usize) -> Self {
        Self {
            organizations,
            projects,
            tests,
            scenarios: Vec::new(),
            data_stores: Vec::new(),
            data_store_polls: RefCell::new(VecDeque::new()),
            organization_calls: Cell::new(0),
            project_calls: Cell::new(0),
            test_calls: RefCell::new(Vec::new()),
            test_run_calls: Cell::new(0),
            data_store_calls: Cell::new(0),
        }
    }
}

pub fn data_store(id: u64, name: &str, status: i32) -> DataStore {
    DataStore {
        id,
        name: name.to_string(),
        status,
        public_url: None,
    }
}

impl AccountApi for FakeAccount {
    fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.organization_calls.set(self.organization_calls.get() + 1);
        Ok((1..=self.organizations as u64)
            .map(|id| Organization {
                id,
                name: format!("Organization{}", id),
            })
            .collect())
    }

    fn list_organization_projects(&self, organization_id: u64) -> Result<Vec<Project>> {
        self.project_calls.set(self.project_calls.get() + 1);
        let first = (organization_id - 1) * self.projects as u64 + 1;
        Ok((first..first + self.projects as u64)
            .map(|id| Project {
                id,
                name: format!("Project{}", id),
            })
            .collect())
    }

    fn list_user_scenarios(&self, _project_id: u64) -> Result<Vec<UserScenario>> {
        Ok(self.scenarios.clone())
    }

    fn list_data_stores(&self, _project_id: u64) -> Result<Vec<DataStore>> {
        Ok(self.data_stores.clone())
    }

    fn get_data_store(&self, id: u64) -> Result<DataStore> {
        self.data_store_calls.set(self.data_store_calls.get() + 1);
        self.data_store_polls
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| CliError::Api {
                status: 404,
                message: format!("No data store {}", id),
            })
    }

    fn list_tests(&self, project_id: u64) -> Result<Vec<Test>> {
        self.test_calls.borrow_mut().push(project_id);
        let first = (project_id - 1) * self.tests as u64 + 1;
        Ok((first..first + self.tests as u64)
            .map(|id| Test {
                id,
                name: format!("Test{}", id),
                last_test_run_id: Some(id * 100),
                config: serde_json::Value::Null,
            })
            .collect())
    }

    fn get_test_run(&self, id: u64) -> Result<TestRun> {
        self.test_run_calls.set(self.test_run_calls.get() + 1);
        Ok(TestRun {
            id,
            status: RunStatus::Finished,
            queued: None,
        })
    }
}
