//! Access to the Load Impact platform
//!
//! The streaming core only depends on [`RunApi`] and the listing commands on
//! [`AccountApi`]; [`ApiClient`] is the HTTP implementation used by the binary,
//! and tests substitute their own.

pub mod client;
pub mod models;
pub mod stream;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use models::{Sample, SampleBatch, TestRun};
pub use stream::PolledResultStream;

use crate::core::status::RunStatus;
use crate::error::Result;
use models::{DataStore, Organization, Project, Test, UserScenario};
use std::time::Duration;

/// Lazy sequence of polled batches. Ends once the run can produce no more data.
pub type ResultStream<'a> = Box<dyn Iterator<Item = Result<SampleBatch>> + 'a>;

/// Operations a live test run needs from the platform
pub trait RunApi {
    /// Start a new run of the given test
    fn start_test_run(&self, test_id: u64) -> Result<TestRun>;

    /// Request the run to stop
    fn abort_test_run(&self, run: &TestRun) -> Result<()>;

    /// Open a fresh stream of sample batches for the given metric wire ids.
    ///
    /// With `raise_on_upstream_error` unset, failed polls yield an empty batch
    /// instead of an error. Transport failures are always yielded as errors.
    fn result_stream<'a>(
        &'a self,
        run: &TestRun,
        metric_ids: &[String],
        poll_interval: Duration,
        raise_on_upstream_error: bool,
    ) -> Result<ResultStream<'a>>;

    /// Current status of the run
    fn test_run_status(&self, run: &TestRun) -> Result<RunStatus>;
}

/// Read-only account queries behind the listing commands
pub trait AccountApi {
    fn list_organizations(&self) -> Result<Vec<Organization>>;

    fn list_organization_projects(&self, organization_id: u64) -> Result<Vec<Project>>;

    fn list_user_scenarios(&self, project_id: u64) -> Result<Vec<UserScenario>>;

    fn list_data_stores(&self, project_id: u64) -> Result<Vec<DataStore>>;

    fn get_data_store(&self, id: u64) -> Result<DataStore>;

    fn list_tests(&self, project_id: u64) -> Result<Vec<Test>>;

    fn get_test_run(&self, id: u64) -> Result<TestRun>;
}
