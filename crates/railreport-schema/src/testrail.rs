use crate::scenario::ScenarioStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TestRail result status ids (system statuses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultStatus {
    Passed,
    Blocked,
    Untested,
    Retest,
    Failed,
}

impl ResultStatus {
    pub fn id(&self) -> u8 {
        match self {
            Self::Passed => 1,
            Self::Blocked => 2,
            Self::Untested => 3,
            Self::Retest => 4,
            Self::Failed => 5,
        }
    }

    /// Total mapping from a runner outcome to a TestRail status.
    ///
    /// Anything that is not a definite pass or fail collapses to `Untested`.
    pub fn from_scenario(status: ScenarioStatus) -> Self {
        match status {
            ScenarioStatus::Passed => Self::Passed,
            ScenarioStatus::Failed => Self::Failed,
            ScenarioStatus::Skipped => Self::Untested,
            ScenarioStatus::Undefined => Self::Untested,
            ScenarioStatus::Executing => Self::Untested,
            ScenarioStatus::Untested => Self::Untested,
        }
    }

    /// `add_result_for_case` rejects `Untested`.
    pub fn is_postable(&self) -> bool {
        *self != Self::Untested
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Passed => "passed",
            Self::Blocked => "blocked",
            Self::Untested => "untested",
            Self::Retest => "retest",
            Self::Failed => "failed",
        };
        write!(f, "{name} ({})", self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRun {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub suite_id: Option<u64>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub suite_id: Option<u64>,
}

/// Result row returned by `add_result_for_case`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: u64,
    #[serde(default)]
    pub test_id: Option<u64>,
    #[serde(default)]
    pub status_id: Option<u64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub elapsed: Option<String>,
}
