use thiserror::Error;

/// Fatal problems found while setting the reporter up.
///
/// All of these surface before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read `{path}` file, check the file exists in root of your project.")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error loading {path} file: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Your {path} config file does not have any project configured!")]
    NoProjects { path: String },

    #[error("The reporter configuration does not have any project configured!")]
    EmptyProjectList,

    #[error("Invalid {path} file! error: {message}")]
    Validation { path: String, message: String },

    #[error("Invalid allowed_branch_pattern {pattern:?} for project {project_id}: {source}")]
    InvalidBranchPattern {
        project_id: u64,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Credentials to authenticate on the TestRail API are not defined! missing: {missing}")]
    MissingCredentials { missing: String },
}

impl ConfigError {
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
