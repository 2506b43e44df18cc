//! Property tests for railreport-schema
//!
//! Status mapping and serialization invariants.

use proptest::prelude::*;
use railreport_schema::scenario::ScenarioStatus;
use railreport_schema::testrail::ResultStatus;

fn strategy_status() -> impl Strategy<Value = ScenarioStatus> {
    prop::sample::select(ScenarioStatus::ALL.to_vec())
}

proptest! {
    // The mapping is deterministic and only ever lands on 1, 3 or 5.
    #[test]
    fn prop_mapping_is_deterministic(status in strategy_status()) {
        let a = ResultStatus::from_scenario(status);
        let b = ResultStatus::from_scenario(status);
        prop_assert_eq!(a, b);
        prop_assert!(matches!(a.id(), 1 | 3 | 5));
    }

    // Only passed and failed outcomes produce a postable result.
    #[test]
    fn prop_postable_iff_definite(status in strategy_status()) {
        let postable = ResultStatus::from_scenario(status).is_postable();
        let definite = matches!(status, ScenarioStatus::Passed | ScenarioStatus::Failed);
        prop_assert_eq!(postable, definite);
    }

    // Status names survive serde.
    #[test]
    fn prop_status_serde_round_trip(status in strategy_status()) {
        let json = serde_json::to_string(&status).unwrap();
        prop_assert_eq!(json.trim_matches('"'), status.as_str());
        let back: ScenarioStatus = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, status);
    }
}
