//! Configuration loading and validation for railreport.
//!
//! The reporter is configured by a YAML file (`testrail.yml` by default) naming
//! the TestRail instance and one or more projects to report into. Credentials
//! never live in the file; see [`Credentials`].

mod credentials;
mod error;
mod validate;

pub use credentials::{Credentials, KEY_ENV, USER_ENV};
pub use error::ConfigError;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "testrail.yml";

/// Validated contents of `testrail.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// TestRail instance, e.g. `https://example.testrail.io`.
    pub base_url: String,

    /// Never empty once loaded.
    pub projects: Vec<ProjectConfig>,

    /// Per-request HTTP timeout. Unset means requests may block indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: u64,

    /// Test run name template; supports `{branch}`, `{project_id}` and `{suite_id}`.
    pub name: String,

    pub suite_id: u64,

    /// Regular expression matched against the start of the branch name.
    pub allowed_branch_pattern: String,
}

impl ProjectConfig {
    /// Compile `allowed_branch_pattern` with start-anchored (not full-string)
    /// matching: `master` accepts `master-hotfix`, `^master$` does not.
    pub fn branch_matcher(&self) -> Result<Regex, ConfigError> {
        Regex::new(&format!("^(?:{})", self.allowed_branch_pattern)).map_err(|source| {
            ConfigError::InvalidBranchPattern {
                project_id: self.id,
                pattern: self.allowed_branch_pattern.clone(),
                source,
            }
        })
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ReporterConfig, ConfigError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: label.clone(),
        source,
    })?;
    tracing::debug!(path = %label, bytes = contents.len(), "loaded configuration file");
    parse_config(&contents, &label)
}

/// Parse and validate configuration text. `origin` names the source in errors.
///
/// Checks run in this order: YAML syntax, at least one project, document
/// shape, branch patterns.
pub fn parse_config(contents: &str, origin: &str) -> Result<ReporterConfig, ConfigError> {
    let mut doc: serde_yaml::Value =
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })?;

    if validate::has_no_projects(&doc) {
        return Err(ConfigError::NoProjects {
            path: origin.to_string(),
        });
    }

    validate::validate_document(&doc).map_err(|message| ConfigError::Validation {
        path: origin.to_string(),
        message,
    })?;
    validate::normalize_ids(&mut doc);

    let config: ReporterConfig =
        serde_yaml::from_value(doc).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })?;

    for project in &config.projects {
        project.branch_matcher()?;
    }

    tracing::debug!(
        origin,
        projects = config.projects.len(),
        "configuration validated"
    );
    Ok(config)
}
