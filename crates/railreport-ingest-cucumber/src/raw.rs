//! Serde view of a Cucumber JSON report. Only the fields the reporter reads.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

/// Cucumber writes `{"name": "@tag", "line": 3}`; behave writes `"tag"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTag {
    Named { name: String },
    Plain(String),
}

impl RawTag {
    pub fn text(&self) -> &str {
        let raw = match self {
            Self::Named { name } => name,
            Self::Plain(name) => name,
        };
        raw.strip_prefix('@').unwrap_or(raw)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawElement {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub steps: Vec<RawStep>,
    #[serde(default)]
    pub before: Vec<RawHook>,
    #[serde(default)]
    pub after: Vec<RawHook>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStep {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    pub result: Option<RawResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHook {
    pub result: Option<RawResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawResult {
    #[serde(default)]
    pub status: String,
    /// Nanoseconds.
    #[serde(default)]
    pub duration: Option<f64>,
}
