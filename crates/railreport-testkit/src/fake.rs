//! In-memory `TestRailApi` that records every call.

use anyhow::{Result, bail};
use railreport_ports::TestRailApi;
use railreport_schema::testrail::{Case, ResultRecord, ResultStatus, TestRun};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CreateRun {
        project_id: u64,
        suite_id: u64,
        name: String,
    },
    GetRun {
        project_id: u64,
        name: String,
    },
    GetCases {
        project_id: u64,
        suite_id: u64,
    },
    CreateResult {
        run_id: u64,
        case_id: String,
        status: ResultStatus,
        comment: String,
        elapsed: String,
        version: Option<String>,
    },
}

/// Fake TestRail server state.
///
/// Cases are keyed by project; runs created through the fake become visible to
/// later lookups, like on a real server.
#[derive(Debug, Default)]
pub struct FakeTestRail {
    cases: BTreeMap<u64, Vec<Case>>,
    runs: RefCell<Vec<(u64, TestRun)>>,
    rejected_cases: BTreeSet<String>,
    broken_projects: BTreeSet<u64>,
    run_creation_fails: bool,
    next_id: Cell<u64>,
    calls: RefCell<Vec<ApiCall>>,
}

impl FakeTestRail {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1000),
            ..Self::default()
        }
    }

    pub fn with_cases(mut self, project_id: u64, ids: impl IntoIterator<Item = u64>) -> Self {
        let cases = self.cases.entry(project_id).or_default();
        cases.extend(ids.into_iter().map(|id| Case {
            id,
            title: format!("case {id}"),
            suite_id: None,
        }));
        self
    }

    /// Seed an incomplete run that `get_test_run_by_project_and_name` can find.
    pub fn with_run(self, project_id: u64, run_id: u64, name: &str) -> Self {
        self.runs.borrow_mut().push((
            project_id,
            TestRun {
                id: run_id,
                name: name.to_string(),
                suite_id: None,
                is_completed: false,
                url: None,
            },
        ));
        self
    }

    /// Make `create_result` fail for this case id.
    pub fn rejecting_results_for(mut self, case_id: &str) -> Self {
        self.rejected_cases.insert(case_id.to_string());
        self
    }

    /// Make `get_cases` fail for this project.
    pub fn failing_case_fetch(mut self, project_id: u64) -> Self {
        self.broken_projects.insert(project_id);
        self
    }

    pub fn failing_run_creation(mut self) -> Self {
        self.run_creation_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    /// Only the `create_result` calls, in order.
    pub fn results(&self) -> Vec<ApiCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, ApiCall::CreateResult { .. }))
            .cloned()
            .collect()
    }

    pub fn case_fetches(&self, project_id: u64) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, ApiCall::GetCases { project_id: p, .. } if *p == project_id))
            .count()
    }

    pub fn runs_created(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, ApiCall::CreateRun { .. }))
            .count()
    }

    fn record(&self, call: ApiCall) {
        self.calls.borrow_mut().push(call);
    }

    fn fresh_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl TestRailApi for FakeTestRail {
    fn create_run(&self, project_id: u64, suite_id: u64, name: &str) -> Result<TestRun> {
        self.record(ApiCall::CreateRun {
            project_id,
            suite_id,
            name: name.to_string(),
        });
        if self.run_creation_fails {
            bail!("Error (403) during POST to endpoint: (add_run/{project_id})");
        }
        let run = TestRun {
            id: self.fresh_id(),
            name: name.to_string(),
            suite_id: Some(suite_id),
            is_completed: false,
            url: None,
        };
        self.runs.borrow_mut().push((project_id, run.clone()));
        Ok(run)
    }

    fn get_test_run_by_project_and_name(
        &self,
        project_id: u64,
        name: &str,
    ) -> Result<Option<TestRun>> {
        self.record(ApiCall::GetRun {
            project_id,
            name: name.to_string(),
        });
        Ok(self
            .runs
            .borrow()
            .iter()
            .find(|(p, run)| *p == project_id && run.name == name)
            .map(|(_, run)| run.clone()))
    }

    fn get_cases(&self, project_id: u64, suite_id: u64) -> Result<Vec<Case>> {
        self.record(ApiCall::GetCases {
            project_id,
            suite_id,
        });
        if self.broken_projects.contains(&project_id) {
            bail!("Error (500) during GET to endpoint: (get_cases/{project_id}&suite_id={suite_id})");
        }
        Ok(self.cases.get(&project_id).cloned().unwrap_or_default())
    }

    fn create_result(
        &self,
        run_id: u64,
        case_id: &str,
        status: ResultStatus,
        comment: &str,
        elapsed: &str,
        version: Option<&str>,
    ) -> Result<ResultRecord> {
        self.record(ApiCall::CreateResult {
            run_id,
            case_id: case_id.to_string(),
            status,
            comment: comment.to_string(),
            elapsed: elapsed.to_string(),
            version: version.map(str::to_string),
        });
        if self.rejected_cases.contains(case_id) {
            bail!("Error (400) during POST to endpoint: (add_result_for_case/{run_id}/{case_id})");
        }
        Ok(ResultRecord {
            id: self.fresh_id(),
            test_id: None,
            status_id: Some(u64::from(status.id())),
            comment: Some(comment.to_string()),
            elapsed: Some(elapsed.to_string()),
        })
    }
}
