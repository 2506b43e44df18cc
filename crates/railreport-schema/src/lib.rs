//! Canonical data types for railreport.
//!
//! `scenario` holds what a test runner hands us (features, scenarios, steps and
//! their outcomes). `testrail` holds the remote records we read and write, plus
//! the mapping from a scenario outcome to a TestRail result status.
//! All other crates depend on these types.

pub mod scenario;
pub mod testrail;
