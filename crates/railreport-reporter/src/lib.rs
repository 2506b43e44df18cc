//! Records BDD scenario outcomes as TestRail results.
//!
//! A scenario is linked to TestRail cases through tags such as
//! `@testrail-C1104`. For every configured project holding that case, the
//! reporter maps the scenario's status, checks the project's branch policy and
//! posts a result into the project's test run for the current branch.

mod project;
mod summary;

pub use project::{Project, render_run_name};
pub use summary::{RunReport, Summary, format_summary};

use anyhow::Result;
use railreport_config::{ConfigError, ReporterConfig};
use railreport_ports::{RunListener, TestRailApi};
use railreport_schema::scenario::{Feature, FeatureElement, Scenario, ScenarioOutline};
use railreport_schema::testrail::{ResultRecord, ResultStatus};
use tracing::{debug, warn};

/// Tag prefix marking a TestRail case id: `testrail-C1104` names case `1104`.
pub const CASE_TAG_PREFIX: &str = "testrail-C";

/// Case id carried by a tag, as written (not parsed as a number).
pub fn case_id_from_tag(tag: &str) -> Option<&str> {
    tag.strip_prefix(CASE_TAG_PREFIX)
}

/// TestRail timespan for a duration in seconds, never below `1s`.
pub fn format_duration(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds >= 1.0 {
        seconds.floor() as u64
    } else {
        1
    };
    format!("{whole}s")
}

/// Scenario name followed by one `-> {keyword} {name} [{status}]` line per step.
pub fn build_comment(scenario: &Scenario) -> String {
    let steps: Vec<String> = scenario
        .steps
        .iter()
        .map(|step| format!("-> {} {} [{}]", step.keyword.trim(), step.name, step.status))
        .collect();
    format!("{}\n{}", scenario.name, steps.join("\n"))
}

#[derive(Debug)]
pub struct TestRailReporter<A> {
    api: A,
    branch: String,
    projects: Vec<Project>,
    summary: Summary,
    duration: f64,
    failed_cases: Vec<String>,
    show_failed_cases: bool,
    version: Option<String>,
}

impl<A: TestRailApi> TestRailReporter<A> {
    /// Build a reporter for `branch` over every project in `config`.
    ///
    /// Nothing is fetched yet; cases and runs load on first use.
    pub fn new(branch: impl Into<String>, config: &ReporterConfig, api: A) -> Result<Self, ConfigError> {
        if config.projects.is_empty() {
            return Err(ConfigError::EmptyProjectList);
        }
        let projects = config
            .projects
            .iter()
            .cloned()
            .map(Project::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            api,
            branch: branch.into(),
            projects,
            summary: Summary::default(),
            duration: 0.0,
            failed_cases: Vec::new(),
            show_failed_cases: true,
            version: None,
        })
    }

    /// Whether [`end`](Self::end) lists the failed case ids.
    pub fn with_show_failed_cases(mut self, show: bool) -> Self {
        self.show_failed_cases = show;
        self
    }

    /// Version string attached to every posted result.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The remote API the reporter posts through.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Branch name checked against each project's allowed pattern.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Configured projects, in configuration order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Per-bucket counts so far.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Case ids whose result could not be recorded. A scenario that failed
    /// but was recorded does not appear here.
    pub fn failed_cases(&self) -> &[String] {
        &self.failed_cases
    }

    /// Handle a completed feature.
    ///
    /// Remote failures never abort the feature. A case list that cannot be
    /// fetched or a result that cannot be posted lands in
    /// [`failed_cases`](Self::failed_cases), and the fetch is retried on the
    /// next tagged scenario.
    pub fn feature(&mut self, feature: &Feature) -> Result<()> {
        self.duration += feature.duration;
        for element in &feature.elements {
            match element {
                FeatureElement::Scenario(scenario) => {
                    self.process_scenario(scenario, &feature.tags)?
                }
                FeatureElement::Outline(outline) => {
                    self.process_scenario_outline(outline, &feature.tags)?
                }
            }
        }
        Ok(())
    }

    /// Every example row is reported on its own, under the outline's tags.
    pub fn process_scenario_outline(
        &mut self,
        outline: &ScenarioOutline,
        feature_tags: &[String],
    ) -> Result<()> {
        for scenario in &outline.scenarios {
            self.report_scenario(scenario, &outline.tags, feature_tags)?;
        }
        Ok(())
    }

    pub fn process_scenario(&mut self, scenario: &Scenario, feature_tags: &[String]) -> Result<()> {
        self.report_scenario(scenario, &scenario.tags, feature_tags)
    }

    fn report_scenario(
        &mut self,
        scenario: &Scenario,
        own_tags: &[String],
        feature_tags: &[String],
    ) -> Result<()> {
        let status = ResultStatus::from_scenario(scenario.status);

        for tag in own_tags.iter().chain(feature_tags) {
            let Some(case_id) = case_id_from_tag(tag) else {
                continue;
            };

            for index in 0..self.projects.len() {
                if let Err(err) = self.projects[index].ensure_cases_loaded(&self.api) {
                    warn!(
                        project_id = self.projects[index].id(),
                        case_id,
                        error = %format!("{err:#}"),
                        "could not load cases"
                    );
                    self.failed_cases.push(case_id.to_string());
                    continue;
                }
                let project = &self.projects[index];

                if !project.has_case(case_id) {
                    self.summary.untested += 1;
                    continue;
                }
                if !status.is_postable() {
                    debug!(project_id = project.id(), case_id, %status, "status not postable");
                    self.summary.skipped += 1;
                    continue;
                }
                if !project.allows_branch(&self.branch) {
                    debug!(project_id = project.id(), case_id, branch = %self.branch, "branch not allowed");
                    self.summary.skipped += 1;
                    continue;
                }

                let comment = build_comment(scenario);
                match self.add_test_result(index, case_id, status, &comment, scenario.duration) {
                    Ok(record) => {
                        debug!(case_id, result_id = record.id, "recorded result");
                        self.summary.passed += 1;
                    }
                    Err(err) => {
                        warn!(
                            project_id = self.projects[index].id(),
                            case_id,
                            error = %format!("{err:#}"),
                            "could not record result"
                        );
                        self.failed_cases.push(case_id.to_string());
                    }
                }
            }
        }
        Ok(())
    }

    /// Post one result into the project's run, setting the run up first if
    /// needed.
    pub fn add_test_result(
        &mut self,
        project_index: usize,
        case_id: &str,
        status: ResultStatus,
        comment: &str,
        elapsed_seconds: f64,
    ) -> Result<ResultRecord> {
        let project = &mut self.projects[project_index];
        let run_id = project.ensure_test_run(&self.api, &self.branch)?.id;
        self.api.create_result(
            run_id,
            case_id,
            status,
            comment,
            &format_duration(elapsed_seconds),
            self.version.as_deref(),
        )
    }

    /// Finish the run. Counters are read, not reset.
    pub fn end(&self) -> RunReport {
        RunReport {
            summary: self.summary,
            failed_cases: self.failed_cases.clone(),
            duration: self.duration,
            show_failed_cases: self.show_failed_cases,
        }
    }
}

impl<A: TestRailApi> RunListener for TestRailReporter<A> {
    type Report = RunReport;

    fn feature(&mut self, feature: &Feature) -> Result<()> {
        TestRailReporter::feature(self, feature)
    }

    fn end(&mut self) -> RunReport {
        TestRailReporter::end(self)
    }
}
