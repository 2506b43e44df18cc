use railreport_config::{ProjectConfig, ReporterConfig};
use railreport_schema::scenario::{
    Feature, FeatureElement, Scenario, ScenarioOutline, ScenarioStatus, Step,
};

pub mod fake;
pub mod proptest;

pub use fake::{ApiCall, FakeTestRail};

/// Small helpers for building fixtures in tests.
///
/// Keeping these in a microcrate avoids copy-paste across reporter/ingest/cli tests.
pub fn step(keyword: &str, name: &str, status: ScenarioStatus) -> Step {
    Step {
        keyword: keyword.to_string(),
        name: name.to_string(),
        status,
    }
}

/// A scenario with a single `Given` step carrying the scenario's status.
pub fn scenario(name: &str, tags: &[&str], status: ScenarioStatus) -> Scenario {
    Scenario {
        name: name.to_string(),
        tags: strings(tags),
        steps: vec![step("Given", "a precondition", status)],
        status,
        duration: 1.0,
    }
}

pub fn outline(name: &str, tags: &[&str], statuses: &[ScenarioStatus]) -> ScenarioOutline {
    let scenarios = statuses
        .iter()
        .enumerate()
        .map(|(row, &status)| scenario(&format!("{name} -- @1.{}", row + 1), tags, status))
        .collect();
    ScenarioOutline {
        name: name.to_string(),
        tags: strings(tags),
        scenarios,
    }
}

/// A feature whose duration is the sum of its scenarios' durations.
pub fn feature(name: &str, tags: &[&str], elements: Vec<FeatureElement>) -> Feature {
    let mut feature = Feature {
        name: name.to_string(),
        tags: strings(tags),
        duration: 0.0,
        elements,
    };
    feature.duration = feature.scenarios().map(|s| s.duration).sum();
    feature
}

pub fn project(id: u64, suite_id: u64, allowed_branch_pattern: &str) -> ProjectConfig {
    ProjectConfig {
        id,
        name: "{branch}".to_string(),
        suite_id,
        allowed_branch_pattern: allowed_branch_pattern.to_string(),
    }
}

pub fn config(projects: Vec<ProjectConfig>) -> ReporterConfig {
    ReporterConfig {
        base_url: "https://test.testrail.net".to_string(),
        projects,
        timeout_seconds: None,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
