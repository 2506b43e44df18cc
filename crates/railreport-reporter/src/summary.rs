use railreport_schema::scenario::ScenarioStatus;
use std::fmt;

/// Per-status counters for one reporter.
///
/// Buckets only ever grow. `failed` exists so the summary reads like the
/// runner's own, but nothing increments it: push failures go to the
/// failed-cases list instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub untested: usize,
}

impl Summary {
    /// Buckets in display order.
    pub fn entries(&self) -> [(ScenarioStatus, usize); 4] {
        [
            (ScenarioStatus::Passed, self.passed),
            (ScenarioStatus::Failed, self.failed),
            (ScenarioStatus::Skipped, self.skipped),
            (ScenarioStatus::Untested, self.untested),
        ]
    }
}

/// Render counters as `"2 testrail test cases passed, 0 failed, 1 skipped"`.
///
/// The first part carries `statement_type`, pluralised unless its count is 1.
/// `untested` is left out when zero.
pub fn format_summary(statement_type: &str, summary: &Summary) -> String {
    let mut parts = Vec::new();
    for (status, count) in summary.entries() {
        if status == ScenarioStatus::Untested && count == 0 {
            continue;
        }
        if parts.is_empty() {
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} {statement_type}{plural} {status}"));
        } else {
            parts.push(format!("{count} {status}"));
        }
    }
    parts.join(", ")
}

/// What a finished run hands back: counters, push failures and total time.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub summary: Summary,
    /// Case ids whose result could not be recorded.
    pub failed_cases: Vec<String>,
    /// Sum of feature durations, in seconds.
    pub duration: f64,
    pub show_failed_cases: bool,
}

impl RunReport {
    pub fn took(&self) -> String {
        let minutes = (self.duration / 60.0).trunc();
        let seconds = self.duration % 60.0;
        format!("Took {minutes:.0}m{seconds:.3}s")
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.show_failed_cases && !self.failed_cases.is_empty() {
            writeln!(f, "Testrail test results failed for test cases:")?;
            writeln!(f)?;
            for case_id in &self.failed_cases {
                writeln!(f, "case_id:  {case_id}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", format_summary("testrail test case", &self.summary))?;
        write!(f, "{}", self.took())
    }
}
