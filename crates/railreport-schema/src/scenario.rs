use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a step or scenario as reported by the test runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Skipped,
    Undefined,
    Executing,
    Untested,
}

impl ScenarioStatus {
    pub const ALL: [ScenarioStatus; 6] = [
        Self::Passed,
        Self::Failed,
        Self::Skipped,
        Self::Undefined,
        Self::Executing,
        Self::Untested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Undefined => "undefined",
            Self::Executing => "executing",
            Self::Untested => "untested",
        }
    }

    /// Parse a status name. Case-insensitive; unknown names yield `None`.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            "undefined" => Some(Self::Undefined),
            "executing" => Some(Self::Executing),
            "untested" => Some(Self::Untested),
            _ => None,
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub keyword: String,
    pub name: String,
    pub status: ScenarioStatus,
}

/// A single executed scenario.
///
/// `tags` are the scenario's own tags without the leading `@`. Feature tags are
/// not copied in; the reporter reads them from the owning [`Feature`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    pub status: ScenarioStatus,
    /// Wall time in seconds.
    #[serde(default)]
    pub duration: f64,
}

/// A parametrized scenario, already expanded into one scenario per example row.
///
/// Every expanded scenario carries the outline's tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutline {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureElement {
    Scenario(Scenario),
    Outline(ScenarioOutline),
}

/// A completed feature: the unit the runner hands over after it finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Wall time in seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub elements: Vec<FeatureElement>,
}

impl Feature {
    /// Concrete scenarios in declaration order, with outlines expanded.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.elements.iter().flat_map(|element| match element {
            FeatureElement::Scenario(s) => std::slice::from_ref(s).iter(),
            FeatureElement::Outline(o) => o.scenarios.iter(),
        })
    }
}
