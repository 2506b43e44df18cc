use anyhow::{Context, Result};
use railreport_config::{ConfigError, ProjectConfig};
use railreport_ports::TestRailApi;
use railreport_schema::testrail::{Case, TestRun};
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info};

/// A configured TestRail project plus what the reporter has fetched for it.
///
/// The case cache and the test run are each fetched at most once.
#[derive(Debug)]
pub struct Project {
    config: ProjectConfig,
    branch_matcher: Regex,
    test_run: Option<TestRun>,
    cases: Option<HashMap<String, Case>>,
}

impl Project {
    pub fn new(config: ProjectConfig) -> Result<Self, ConfigError> {
        let branch_matcher = config.branch_matcher()?;
        Ok(Self {
            config,
            branch_matcher,
            test_run: None,
            cases: None,
        })
    }

    pub fn id(&self) -> u64 {
        self.config.id
    }

    pub fn suite_id(&self) -> u64 {
        self.config.suite_id
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn test_run(&self) -> Option<&TestRun> {
        self.test_run.as_ref()
    }

    pub fn test_run_name(&self, branch: &str) -> String {
        render_run_name(&self.config.name, branch, self.config.id, self.config.suite_id)
    }

    /// Whether results may be recorded from `branch`. The pattern only has to
    /// match at the start of the branch name.
    pub fn allows_branch(&self, branch: &str) -> bool {
        self.branch_matcher.is_match(branch)
    }

    pub fn cases_loaded(&self) -> bool {
        self.cases.is_some()
    }

    /// `false` until the cache is loaded.
    pub fn has_case(&self, case_id: &str) -> bool {
        self.cases
            .as_ref()
            .is_some_and(|cases| cases.contains_key(case_id))
    }

    pub fn ensure_cases_loaded(&mut self, api: &impl TestRailApi) -> Result<()> {
        if self.cases.is_some() {
            return Ok(());
        }
        let cases = api
            .get_cases(self.config.id, self.config.suite_id)
            .with_context(|| {
                format!(
                    "failed to load cases for project {} (suite {})",
                    self.config.id, self.config.suite_id
                )
            })?;
        debug!(
            project_id = self.config.id,
            suite_id = self.config.suite_id,
            cases = cases.len(),
            "loaded case cache"
        );
        self.cases = Some(
            cases
                .into_iter()
                .map(|case| (case.id.to_string(), case))
                .collect(),
        );
        Ok(())
    }

    /// Find the incomplete run named for `branch`, creating it if absent.
    pub fn ensure_test_run(&mut self, api: &impl TestRailApi, branch: &str) -> Result<&TestRun> {
        if self.test_run.is_none() {
            let name = self.test_run_name(branch);
            let run = match api.get_test_run_by_project_and_name(self.config.id, &name)? {
                Some(run) => {
                    info!(project_id = self.config.id, run_id = run.id, %name, "reusing test run");
                    run
                }
                None => {
                    let run = api.create_run(self.config.id, self.config.suite_id, &name)?;
                    info!(project_id = self.config.id, run_id = run.id, %name, "created test run");
                    run
                }
            };
            self.test_run = Some(run);
        }
        self.test_run
            .as_ref()
            .context("test run missing after setup")
    }
}

/// Substitute `{branch}`, `{project_id}` and `{suite_id}` in a run name
/// template. Other braces are left alone.
pub fn render_run_name(template: &str, branch: &str, project_id: u64, suite_id: u64) -> String {
    template
        .replace("{project_id}", &project_id.to_string())
        .replace("{suite_id}", &suite_id.to_string())
        .replace("{branch}", branch)
}
