//! TestRail API v2 client.
//!
//! Wraps a [`Transport`] with endpoint construction, error classification and
//! transparent pagination of list endpoints. Every call is a single blocking
//! round trip (or one per page); nothing is retried.

mod error;
mod pagination;
mod transport;

pub use error::ApiError;
pub use transport::{HttpTransport, RawResponse, Transport};

use railreport_config::{Credentials, ReporterConfig};
use railreport_ports::TestRailApi;
use railreport_schema::testrail::{Case, ResultRecord, ResultStatus, TestRun};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct TestRailClient<T = HttpTransport> {
    transport: T,
    api_root: String,
}

impl TestRailClient<HttpTransport> {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, credentials, None)
    }

    pub fn with_timeout(
        base_url: &str,
        credentials: Credentials,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(credentials, timeout)?;
        Self::with_transport(base_url, transport)
    }

    pub fn from_config(config: &ReporterConfig, credentials: Credentials) -> Result<Self, ApiError> {
        Self::with_timeout(
            &config.base_url,
            credentials,
            config.timeout_seconds.map(Duration::from_secs),
        )
    }
}

impl<T: Transport> TestRailClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, ApiError> {
        url::Url::parse(base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            transport,
            api_root: api_root(base_url),
        })
    }

    /// `{base_url}/index.php?/api/v2/`
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoint(&self, uri: &str) -> String {
        format!("{}{}", self.api_root, uri)
    }

    pub fn send_get(&self, uri: &str) -> Result<Value, ApiError> {
        debug!(uri, "GET");
        let resp = self.transport.get(&self.endpoint(uri))?;
        if !resp.is_success() {
            return Err(ApiError::Status {
                method: "GET",
                endpoint: uri.to_string(),
                payload: None,
                status: resp.status,
                body: resp.body,
            });
        }
        decode(uri, &resp.body)
    }

    pub fn send_post(&self, uri: &str, data: &Value) -> Result<Value, ApiError> {
        debug!(uri, "POST");
        let resp = self.transport.post(&self.endpoint(uri), data)?;
        if !resp.is_success() {
            return Err(ApiError::Status {
                method: "POST",
                endpoint: uri.to_string(),
                payload: Some(data.to_string()),
                status: resp.status,
                body: resp.body,
            });
        }
        decode(uri, &resp.body)
    }

    /// Fetch every page of a list endpoint, following `_links.next` until it
    /// is absent. Items keep page order then in-page order.
    pub fn get_all<R: DeserializeOwned>(&self, uri: &str, items_key: &str) -> Result<Vec<R>, ApiError> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(uri.to_string());
        let mut pages = 0usize;

        while let Some(current) = next.take() {
            if !seen.insert(current.clone()) {
                return Err(ApiError::Pagination {
                    endpoint: current,
                    message: "next link points at a page already fetched".to_string(),
                });
            }

            let body = self.send_get(&current)?;
            let page = pagination::parse_page(body, items_key).map_err(|message| {
                ApiError::Pagination {
                    endpoint: current.clone(),
                    message,
                }
            })?;
            for item in page.items {
                let record = serde_json::from_value(item).map_err(|source| ApiError::Decode {
                    endpoint: current.clone(),
                    source,
                })?;
                out.push(record);
            }
            pages += 1;
            next = page.next;
        }

        debug!(uri, pages, items = out.len(), "fetched paginated list");
        Ok(out)
    }

    pub fn create_run(&self, project_id: u64, suite_id: u64, name: &str) -> Result<TestRun, ApiError> {
        let uri = format!("add_run/{project_id}");
        let data = json!({
            "suite_id": suite_id,
            "name": name,
            "include_all": true,
        });
        let created = self.send_post(&uri, &data)?;
        serde_json::from_value(created).map_err(|source| ApiError::Decode { endpoint: uri, source })
    }

    pub fn get_test_run_by_project_and_name(
        &self,
        project_id: u64,
        name: &str,
    ) -> Result<Option<TestRun>, ApiError> {
        let uri = format!("get_runs/{project_id}&is_completed=0");
        let runs: Vec<TestRun> = self.get_all(&uri, "runs")?;
        Ok(runs.into_iter().find(|run| run.name == name))
    }

    pub fn get_cases(&self, project_id: u64, suite_id: u64) -> Result<Vec<Case>, ApiError> {
        let uri = format!("get_cases/{project_id}&suite_id={suite_id}");
        self.get_all(&uri, "cases")
    }

    pub fn create_result(
        &self,
        run_id: u64,
        case_id: &str,
        status: ResultStatus,
        comment: &str,
        elapsed: &str,
        version: Option<&str>,
    ) -> Result<ResultRecord, ApiError> {
        let uri = format!("add_result_for_case/{run_id}/{case_id}");
        let data = json!({
            "status_id": status.id(),
            "comment": comment,
            "version": version,
            "elapsed": elapsed,
        });
        let created = self.send_post(&uri, &data)?;
        serde_json::from_value(created).map_err(|source| ApiError::Decode { endpoint: uri, source })
    }
}

impl<T: Transport> TestRailApi for TestRailClient<T> {
    fn create_run(&self, project_id: u64, suite_id: u64, name: &str) -> anyhow::Result<TestRun> {
        Ok(TestRailClient::<T>::create_run(self, project_id, suite_id, name)?)
    }

    fn get_test_run_by_project_and_name(
        &self,
        project_id: u64,
        name: &str,
    ) -> anyhow::Result<Option<TestRun>> {
        Ok(TestRailClient::<T>::get_test_run_by_project_and_name(
            self, project_id, name,
        )?)
    }

    fn get_cases(&self, project_id: u64, suite_id: u64) -> anyhow::Result<Vec<Case>> {
        Ok(TestRailClient::<T>::get_cases(self, project_id, suite_id)?)
    }

    fn create_result(
        &self,
        run_id: u64,
        case_id: &str,
        status: ResultStatus,
        comment: &str,
        elapsed: &str,
        version: Option<&str>,
    ) -> anyhow::Result<ResultRecord> {
        Ok(TestRailClient::<T>::create_result(
            self, run_id, case_id, status, comment, elapsed, version,
        )?)
    }
}

fn api_root(base_url: &str) -> String {
    let mut root = base_url.to_string();
    if !root.ends_with('/') {
        root.push('/');
    }
    root.push_str("index.php?/api/v2/");
    root
}

fn decode(uri: &str, body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        endpoint: uri.to_string(),
        source,
    })
}
