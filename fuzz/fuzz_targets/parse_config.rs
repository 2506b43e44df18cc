//! Fuzz harness for `testrail.yml`.
//!
//! Any input must either load or produce a `ConfigError`; never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(config) = railreport_config::parse_config(input, "testrail.yml") {
        assert!(!config.projects.is_empty());
        for project in &config.projects {
            assert!(project.branch_matcher().is_ok());
        }
    }
});
