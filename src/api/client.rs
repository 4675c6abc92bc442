//! Blocking HTTP client for the Load Impact v3 REST API
//!
//! Every resource is wrapped in a JSON envelope keyed by its name, e.g.
//! `{"test_run": {...}}` or `{"organizations": [...]}`. Authentication is HTTP
//! basic auth with the API token as user name and an empty password.

use super::models::{
    DataStore, DataStoreUpload, NewUserScenario, Organization, Project, Test, TestRun,
    TestRunResult, TestRunResultIds, UserScenario, UserScenarioValidation, ValidationResult,
};
use super::stream::{PolledResultStream, ResultSource};
use super::{AccountApi, ResultStream, RunApi};
use crate::core::status::RunStatus;
use crate::error::{CliError, Result};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.loadimpact.com/v3/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest error body echoed back to the user
const MAX_ERROR_BODY: usize = 200;

pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    pub fn new(token: impl Into<String>, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(format!("LoadImpactCLI/{}", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.basic_auth(&self.token, Some("")).send()?;
        check_status(response)
    }

    fn get_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        key: &str,
    ) -> Result<T> {
        let url = self.url(path)?;
        log::debug!("GET {} {:?}", url, query);
        let response = self.send(self.http.get(url).query(query))?;
        unwrap_envelope(response.json()?, key)
    }

    fn post_resource<T: DeserializeOwned>(&self, path: &str, body: &Value, key: &str) -> Result<T> {
        let url = self.url(path)?;
        log::debug!("POST {}", url);
        let response = self.send(self.http.post(url).json(body))?;
        unwrap_envelope(response.json()?, key)
    }

    // User scenarios

    pub fn get_user_scenario(&self, id: u64) -> Result<UserScenario> {
        self.get_resource(&format!("user-scenarios/{}", id), &[], "user_scenario")
    }

    pub fn create_user_scenario(&self, scenario: &NewUserScenario) -> Result<UserScenario> {
        self.post_resource("user-scenarios", &serde_json::to_value(scenario)?, "user_scenario")
    }

    pub fn update_user_scenario_script(&self, id: u64, script: &str) -> Result<UserScenario> {
        let url = self.url(&format!("user-scenarios/{}", id))?;
        log::debug!("PATCH {}", url);
        self.send(self.http.patch(url).json(&json!({ "script": script })))?;
        self.get_user_scenario(id)
    }

    pub fn delete_user_scenario(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("user-scenarios/{}", id))?;
        log::debug!("DELETE {}", url);
        self.send(self.http.delete(url))?;
        Ok(())
    }

    pub fn validate_user_scenario(&self, id: u64) -> Result<UserScenarioValidation> {
        self.post_resource(
            &format!("user-scenarios/{}/validate", id),
            &json!({}),
            "user_scenario_validation",
        )
    }

    pub fn get_user_scenario_validation(&self, id: u64) -> Result<UserScenarioValidation> {
        self.get_resource(
            &format!("user-scenario-validations/{}", id),
            &[],
            "user_scenario_validation",
        )
    }

    pub fn get_user_scenario_validation_results(&self, id: u64) -> Result<Vec<ValidationResult>> {
        self.get_resource(
            &format!("user-scenario-validations/{}/results", id),
            &[],
            "user_scenario_validation_results",
        )
    }

    // Data stores

    pub fn create_data_store(&self, upload: &DataStoreUpload, file: &Path) -> Result<DataStore> {
        let url = self.url("data-stores")?;
        log::debug!("POST {} ({})", url, file.display());
        let response = self.send(self.http.post(url).multipart(upload_form(upload, file)?))?;
        unwrap_envelope(response.json()?, "data_store")
    }

    pub fn update_data_store(
        &self,
        id: u64,
        upload: &DataStoreUpload,
        file: &Path,
    ) -> Result<DataStore> {
        let url = self.url(&format!("data-stores/{}", id))?;
        log::debug!("PUT {} ({})", url, file.display());
        let response = self.send(self.http.put(url).multipart(upload_form(upload, file)?))?;
        unwrap_envelope(response.json()?, "data_store")
    }

    /// Download a data store CSV from its public URL, returning the byte count
    pub fn download_data_store(&self, data_store: &DataStore, destination: &Path) -> Result<u64> {
        let public_url = data_store.public_url.as_deref().ok_or_else(|| {
            CliError::other(format!("Data store {} has no downloadable file", data_store.id))
        })?;

        log::debug!("GET {}", public_url);
        let mut response = check_status(self.http.get(public_url).send()?)?;
        let mut file = File::create(destination)?;
        Ok(response.copy_to(&mut file)?)
    }

    // Tests and test runs

    pub fn list_test_run_result_ids(
        &self,
        test_run_id: u64,
        type_codes: &[u8],
    ) -> Result<Vec<TestRunResultIds>> {
        let mut query = Vec::new();
        if !type_codes.is_empty() {
            let types: Vec<String> = type_codes.iter().map(u8::to_string).collect();
            query.push(("types", types.join(",")));
        }
        self.get_resource(
            &format!("test-runs/{}/result-ids", test_run_id),
            &query,
            "test_run_result_ids",
        )
    }
}

impl AccountApi for ApiClient {
    fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.get_resource("organizations", &[], "organizations")
    }

    fn list_organization_projects(&self, organization_id: u64) -> Result<Vec<Project>> {
        self.get_resource(
            &format!("organizations/{}/projects", organization_id),
            &[],
            "projects",
        )
    }

    fn list_user_scenarios(&self, project_id: u64) -> Result<Vec<UserScenario>> {
        self.get_resource(
            "user-scenarios",
            &[("project_id", project_id.to_string())],
            "user_scenarios",
        )
    }

    fn list_data_stores(&self, project_id: u64) -> Result<Vec<DataStore>> {
        self.get_resource(
            "data-stores",
            &[("project_id", project_id.to_string())],
            "data_stores",
        )
    }

    fn get_data_store(&self, id: u64) -> Result<DataStore> {
        self.get_resource(&format!("data-stores/{}", id), &[], "data_store")
    }

    fn list_tests(&self, project_id: u64) -> Result<Vec<Test>> {
        self.get_resource("tests", &[("project_id", project_id.to_string())], "tests")
    }

    fn get_test_run(&self, id: u64) -> Result<TestRun> {
        self.get_resource(&format!("test-runs/{}", id), &[], "test_run")
    }
}

impl ResultSource for ApiClient {
    fn fetch_results(&self, test_run_id: u64, metric_ids: &[String]) -> Result<Vec<TestRunResult>> {
        self.get_resource(
            &format!("test-runs/{}/results", test_run_id),
            &[("ids", metric_ids.join(","))],
            "test_run_results",
        )
    }

    fn run_status(&self, test_run_id: u64) -> Result<RunStatus> {
        Ok(self.get_test_run(test_run_id)?.status)
    }
}

impl RunApi for ApiClient {
    fn start_test_run(&self, test_id: u64) -> Result<TestRun> {
        self.post_resource(&format!("tests/{}/start", test_id), &json!({}), "test_run")
    }

    fn abort_test_run(&self, run: &TestRun) -> Result<()> {
        let url = self.url(&format!("test-runs/{}/abort", run.id))?;
        log::debug!("POST {}", url);
        self.send(self.http.post(url))?;
        Ok(())
    }

    fn result_stream<'a>(
        &'a self,
        run: &TestRun,
        metric_ids: &[String],
        poll_interval: Duration,
        raise_on_upstream_error: bool,
    ) -> Result<ResultStream<'a>> {
        Ok(Box::new(PolledResultStream::new(
            self,
            run.id,
            metric_ids.to_vec(),
            poll_interval,
            raise_on_upstream_error,
        )))
    }

    fn test_run_status(&self, run: &TestRun) -> Result<RunStatus> {
        self.run_status(run.id)
    }
}

fn upload_form(upload: &DataStoreUpload, file: &Path) -> Result<multipart::Form> {
    let form = multipart::Form::new()
        .text("name", upload.name.clone())
        .text("project_id", upload.project_id.to_string())
        .text("delimiter", upload.delimiter.clone())
        .text("separator", upload.separator.clone())
        .text("fromline", upload.fromline.to_string())
        .file("file", file)?;
    Ok(form)
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(CliError::Unauthorized);
    }

    let body = response.text().unwrap_or_default();
    Err(CliError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Extract `{"error": {"message": ...}}` when present, else a clipped body
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.pointer("/error/message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}

fn unwrap_envelope<T: DeserializeOwned>(mut value: Value, key: &str) -> Result<T> {
    let inner = value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| CliError::other(format!("Response is missing '{}'", key)))?;
    Ok(serde_json::from_value(inner)?)
}
