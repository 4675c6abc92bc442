// Resources returned by the Load Impact v3 API

use crate::core::status::RunStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserScenario {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub data_store_ids: Vec<u64>,
}

/// Body for creating a user scenario
#[derive(Debug, Clone, Serialize)]
pub struct NewUserScenario {
    pub name: String,
    pub script: String,
    pub project_id: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_store_ids: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Queued,
    Initializing,
    Running,
    Finished,
    Failed,
}

impl ValidationStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ValidationStatus::Queued,
            1 => ValidationStatus::Initializing,
            2 => ValidationStatus::Running,
            3 => ValidationStatus::Finished,
            _ => ValidationStatus::Failed,
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, ValidationStatus::Finished | ValidationStatus::Failed)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserScenarioValidation {
    pub id: u64,
    pub status: i32,
}

impl UserScenarioValidation {
    pub fn status(&self) -> ValidationStatus {
        ValidationStatus::from_code(self.status)
    }

    pub fn is_done(&self) -> bool {
        self.status().is_done()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationResult {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub level: Option<String>,
    pub message: String,
}

/// Conversion state of an uploaded CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStoreStatus {
    Queued,
    Converting,
    Finished,
    Failed,
}

impl DataStoreStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => DataStoreStatus::Queued,
            1 => DataStoreStatus::Converting,
            2 => DataStoreStatus::Finished,
            _ => DataStoreStatus::Failed,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            DataStoreStatus::Queued => "queued",
            DataStoreStatus::Converting => "converting",
            DataStoreStatus::Finished => "finished",
            DataStoreStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataStore {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub public_url: Option<String>,
}

impl DataStore {
    pub fn status(&self) -> DataStoreStatus {
        DataStoreStatus::from_code(self.status)
    }

    pub fn has_conversion_finished(&self) -> bool {
        matches!(
            self.status(),
            DataStoreStatus::Finished | DataStoreStatus::Failed
        )
    }
}

/// Upload parameters for a CSV data store
#[derive(Debug, Clone)]
pub struct DataStoreUpload {
    pub name: String,
    pub project_id: u64,
    pub delimiter: String,
    pub separator: String,
    pub fromline: u32,
}

impl DataStoreUpload {
    /// Settings used for files attached while creating a user scenario
    pub fn with_defaults(name: impl Into<String>, project_id: u64) -> Self {
        Self {
            name: name.into(),
            project_id,
            delimiter: "double".to_string(),
            separator: "comma".to_string(),
            fromline: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Test {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub last_test_run_id: Option<u64>,
    #[serde(default)]
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestRun {
    pub id: u64,
    pub status: RunStatus,
    #[serde(default)]
    pub queued: Option<DateTime<Utc>>,
}

/// One entry of the result id listing of a test run
#[derive(Debug, Clone, Deserialize)]
pub struct TestRunResultIds {
    #[serde(rename = "type")]
    pub type_code: u8,
    pub ids: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Series for one metric id in a results poll
#[derive(Debug, Clone, Deserialize)]
pub struct TestRunResult {
    pub id: String,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

/// A single polled metric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Newest sample per metric wire id, produced once per poll
pub type SampleBatch = BTreeMap<String, Sample>;
