//! Cucumber JSON ingestion.
//!
//! Turns the `--format json` output of cucumber (and compatible runners) into
//! [`Feature`]s that can be replayed through a [`RunListener`](railreport_ports::RunListener).

mod raw;

use anyhow::{Context, Result};
use railreport_ports::Ingestor;
use railreport_schema::scenario::{
    Feature, FeatureElement, Scenario, ScenarioOutline, ScenarioStatus, Step,
};
use raw::{RawElement, RawFeature, RawResult, RawTag};
use std::path::PathBuf;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Reads one Cucumber JSON results file.
pub struct CucumberIngestor {
    pub path: PathBuf,
}

impl CucumberIngestor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Ingestor for CucumberIngestor {
    fn ingest(&self) -> Result<Vec<Feature>> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {:?}", self.path))?;
        let features = parse_cucumber_json(&text)
            .with_context(|| format!("parse cucumber results {:?}", self.path))?;
        tracing::debug!(
            path = %self.path.display(),
            features = features.len(),
            "ingested cucumber results"
        );
        Ok(features)
    }
}

pub fn parse_cucumber_json(text: &str) -> Result<Vec<Feature>> {
    let raw: Vec<RawFeature> =
        serde_json::from_str(text).context("expected a JSON array of features")?;
    Ok(raw.into_iter().map(convert_feature).collect())
}

/// Runner status string to [`ScenarioStatus`].
///
/// `pending` counts as skipped and `ambiguous` as failed; anything unknown is
/// untested.
pub fn parse_status(status: &str) -> ScenarioStatus {
    if let Some(known) = ScenarioStatus::from_name(status) {
        return known;
    }
    match status.trim().to_ascii_lowercase().as_str() {
        "pending" => ScenarioStatus::Skipped,
        "ambiguous" => ScenarioStatus::Failed,
        _ => ScenarioStatus::Untested,
    }
}

/// Overall outcome of a scenario from its step and hook outcomes.
pub fn aggregate_status(steps: &[ScenarioStatus], hooks: &[ScenarioStatus]) -> ScenarioStatus {
    let all = || steps.iter().chain(hooks);
    if all().any(|s| *s == ScenarioStatus::Failed) {
        ScenarioStatus::Failed
    } else if all().any(|s| *s == ScenarioStatus::Undefined) {
        ScenarioStatus::Undefined
    } else if steps.is_empty() {
        ScenarioStatus::Untested
    } else if all().all(|s| *s == ScenarioStatus::Passed) {
        ScenarioStatus::Passed
    } else {
        ScenarioStatus::Skipped
    }
}

fn convert_feature(raw: RawFeature) -> Feature {
    let mut elements: Vec<FeatureElement> = Vec::new();

    for element in raw.elements {
        if is_background(&element) {
            continue;
        }
        let outline_name =
            is_outline_row(&element).then(|| outline_base_name(&element.name).to_string());
        let Some(name) = outline_name else {
            elements.push(FeatureElement::Scenario(convert_scenario(element)));
            continue;
        };
        let scenario = convert_scenario(element);

        if let Some(FeatureElement::Outline(outline)) = elements.last_mut()
            && outline.name == name
        {
            outline.scenarios.push(scenario);
            continue;
        }
        elements.push(FeatureElement::Outline(ScenarioOutline {
            name,
            tags: scenario.tags.clone(),
            scenarios: vec![scenario],
        }));
    }

    let mut feature = Feature {
        name: raw.name,
        tags: tag_texts(&raw.tags),
        duration: 0.0,
        elements,
    };
    feature.duration = feature.scenarios().map(|s| s.duration).sum();
    feature
}

fn convert_scenario(raw: RawElement) -> Scenario {
    let hooks: Vec<&RawResult> = raw
        .before
        .iter()
        .chain(&raw.after)
        .filter_map(|hook| hook.result.as_ref())
        .collect();

    let steps: Vec<Step> = raw
        .steps
        .iter()
        .map(|step| Step {
            keyword: step.keyword.trim().to_string(),
            name: step.name.clone(),
            status: step
                .result
                .as_ref()
                .map_or(ScenarioStatus::Untested, |r| parse_status(&r.status)),
        })
        .collect();

    let step_statuses: Vec<ScenarioStatus> = steps.iter().map(|s| s.status).collect();
    let hook_statuses: Vec<ScenarioStatus> =
        hooks.iter().map(|r| parse_status(&r.status)).collect();

    let nanos: f64 = raw
        .steps
        .iter()
        .filter_map(|step| step.result.as_ref())
        .chain(hooks.iter().copied())
        .filter_map(|r| r.duration)
        .sum();

    Scenario {
        name: raw.name,
        tags: tag_texts(&raw.tags),
        status: aggregate_status(&step_statuses, &hook_statuses),
        steps,
        duration: nanos / NANOS_PER_SECOND,
    }
}

fn tag_texts(tags: &[RawTag]) -> Vec<String> {
    tags.iter().map(|t| t.text().to_string()).collect()
}

fn is_background(element: &RawElement) -> bool {
    element.kind.eq_ignore_ascii_case("background")
        || element.keyword.trim().eq_ignore_ascii_case("background")
}

fn is_outline_row(element: &RawElement) -> bool {
    let keyword = element.keyword.trim();
    keyword.eq_ignore_ascii_case("scenario outline")
        || keyword.eq_ignore_ascii_case("scenario template")
}

/// Some runners name rows `Totals -- @1.2 Examples`; rows of one outline share
/// the part before ` -- @`.
fn outline_base_name(name: &str) -> &str {
    name.split(" -- @").next().unwrap_or(name).trim_end()
}
