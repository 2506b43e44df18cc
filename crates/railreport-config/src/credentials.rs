use crate::error::ConfigError;
use std::fmt;

pub const USER_ENV: &str = "TESTRAIL_USER";
pub const KEY_ENV: &str = "TESTRAIL_KEY";

/// TestRail user identity and API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    key: String,
}

impl Credentials {
    /// Both values must be non-empty.
    pub fn new(user: impl Into<String>, key: impl Into<String>) -> Result<Self, ConfigError> {
        let user = user.into();
        let key = key.into();

        let mut missing = Vec::new();
        if user.trim().is_empty() {
            missing.push(USER_ENV);
        }
        if key.trim().is_empty() {
            missing.push(KEY_ENV);
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials {
                missing: missing.join(", "),
            });
        }

        Ok(Self { user, key })
    }

    /// Read `TESTRAIL_USER` / `TESTRAIL_KEY` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Credentials::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let user = lookup(USER_ENV).unwrap_or_default();
        let key = lookup(KEY_ENV).unwrap_or_default();
        Self::new(user, key)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn both_missing_is_an_error() {
        let err = Credentials::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials { .. }));
        assert!(err.to_string().contains("TESTRAIL_USER, TESTRAIL_KEY"));
    }

    #[test]
    fn user_missing_is_an_error() {
        let err = Credentials::from_lookup(lookup(&[(KEY_ENV, "simpson123")])).unwrap_err();
        assert!(err.to_string().ends_with("missing: TESTRAIL_USER"));
    }

    #[test]
    fn key_missing_is_an_error() {
        let err =
            Credentials::from_lookup(lookup(&[(USER_ENV, "homer@springfield.test")])).unwrap_err();
        assert!(err.to_string().ends_with("missing: TESTRAIL_KEY"));
    }

    #[test]
    fn empty_values_count_as_missing() {
        assert!(Credentials::new("", "k").is_err());
        assert!(Credentials::new("u", "  ").is_err());
    }

    #[test]
    fn user_and_key_are_kept() {
        let creds = Credentials::from_lookup(lookup(&[
            (USER_ENV, "homer@springfield.test"),
            (KEY_ENV, "simpson123"),
        ]))
        .unwrap();
        assert_eq!(creds.user(), "homer@springfield.test");
        assert_eq!(creds.key(), "simpson123");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let creds = Credentials::new("homer", "simpson123").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("homer"));
        assert!(!debug.contains("simpson123"));
    }
}
