//! Proptest strategies shared by railreport property tests.

use proptest::prelude::*;
use railreport_schema::scenario::ScenarioStatus;

pub fn strategy_scenario_status() -> impl Strategy<Value = ScenarioStatus> {
    prop::sample::select(ScenarioStatus::ALL.to_vec())
}

/// Branch names as CI systems hand them over.
pub fn strategy_branch_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("master".to_string()),
        Just("main".to_string()),
        "(feature|bugfix|release)/[a-z0-9-]{1,16}",
    ]
}

/// Tags that never carry a case id.
pub fn strategy_plain_tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,12}".prop_filter("case tag", |tag| !tag.starts_with("testrail-C"))
}

/// Elapsed wall time in seconds, including sub-second values.
pub fn strategy_duration() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.0f64..1.0, 0.0f64..100_000.0]
}
