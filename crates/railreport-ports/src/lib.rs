use anyhow::Result;
use railreport_schema::scenario::Feature;
use railreport_schema::testrail::{Case, ResultRecord, ResultStatus, TestRun};

/// Remote operations the reporter needs from TestRail.
///
/// The HTTP adapter lives in `railreport-api`; tests use the recording fake in
/// `railreport-testkit`. List operations return every page already accumulated.
pub trait TestRailApi {
    fn create_run(&self, project_id: u64, suite_id: u64, name: &str) -> Result<TestRun>;

    /// First incomplete run of the project whose name equals `name` exactly.
    fn get_test_run_by_project_and_name(&self, project_id: u64, name: &str)
        -> Result<Option<TestRun>>;

    fn get_cases(&self, project_id: u64, suite_id: u64) -> Result<Vec<Case>>;

    /// `elapsed` is already formatted as a TestRail timespan, e.g. `"69s"`.
    fn create_result(
        &self,
        run_id: u64,
        case_id: &str,
        status: ResultStatus,
        comment: &str,
        elapsed: &str,
        version: Option<&str>,
    ) -> Result<ResultRecord>;
}

impl<T: TestRailApi + ?Sized> TestRailApi for &T {
    fn create_run(&self, project_id: u64, suite_id: u64, name: &str) -> Result<TestRun> {
        (**self).create_run(project_id, suite_id, name)
    }

    fn get_test_run_by_project_and_name(
        &self,
        project_id: u64,
        name: &str,
    ) -> Result<Option<TestRun>> {
        (**self).get_test_run_by_project_and_name(project_id, name)
    }

    fn get_cases(&self, project_id: u64, suite_id: u64) -> Result<Vec<Case>> {
        (**self).get_cases(project_id, suite_id)
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
        (**self).create_result(run_id, case_id, status, comment, elapsed, version)
    }
}

/// Source of completed features, e.g. a results file written by a runner.
pub trait Ingestor {
    fn ingest(&self) -> Result<Vec<Feature>>;
}

/// Lifecycle callbacks a test runner drives.
///
/// The runner calls `feature` once per completed feature, in execution order,
/// then `end` once.
pub trait RunListener {
    type Report;

    fn feature(&mut self, feature: &Feature) -> Result<()>;

    fn end(&mut self) -> Self::Report;
}

/// Feed recorded features through a listener, then finish the run.
///
/// Stops at the first feature the listener rejects.
pub fn replay<'a, L>(
    listener: &mut L,
    features: impl IntoIterator<Item = &'a Feature>,
) -> Result<L::Report>
where
    L: RunListener + ?Sized,
{
    for feature in features {
        listener.feature(feature)?;
    }
    Ok(listener.end())
}
