use proptest::prelude::*;
use railreport_reporter::{Summary, TestRailReporter, format_duration, render_run_name};
use railreport_schema::scenario::{FeatureElement, ScenarioStatus};
use railreport_schema::testrail::ResultStatus;
use railreport_testkit::proptest::{
    strategy_branch_name, strategy_duration, strategy_plain_tag, strategy_scenario_status,
};
use railreport_testkit::{FakeTestRail, config, feature, project, scenario};

fn counted(summary: &Summary) -> usize {
    summary.passed + summary.failed + summary.skipped + summary.untested
}

proptest! {
    #[test]
    fn duration_is_floor_with_minimum_one(d in strategy_duration()) {
        let expected = (d.floor() as u64).max(1);
        prop_assert_eq!(format_duration(d), format!("{expected}s"));
    }

    #[test]
    fn run_name_without_placeholders_is_unchanged(
        template in "[A-Za-z0-9 _./-]{0,24}",
        branch in strategy_branch_name(),
        project_id in 1u64..10_000,
        suite_id in 1u64..10_000,
    ) {
        prop_assert_eq!(render_run_name(&template, &branch, project_id, suite_id), template);
    }

    #[test]
    fn run_name_substitutes_every_placeholder(
        branch in strategy_branch_name(),
        project_id in 1u64..10_000,
        suite_id in 1u64..10_000,
    ) {
        let template = "{branch}-{project_id}-{suite_id}";
        let first = render_run_name(template, &branch, project_id, suite_id);
        prop_assert_eq!(&first, &format!("{branch}-{project_id}-{suite_id}"));
        prop_assert_eq!(render_run_name(template, &branch, project_id, suite_id), first);
    }

    #[test]
    fn absent_case_never_posts(
        status in strategy_scenario_status(),
        projects in 1usize..4,
    ) {
        let api = FakeTestRail::new();
        let cfg = config((1..=projects as u64).map(|id| project(id, id * 10, ".*")).collect());
        let mut reporter = TestRailReporter::new("master", &cfg, &api).unwrap();

        let s = scenario("s", &["testrail-C42"], status);
        reporter.feature(&feature("f", &[], vec![FeatureElement::Scenario(s)])).unwrap();

        prop_assert!(api.results().is_empty());
        prop_assert_eq!(reporter.summary().untested, projects);
        prop_assert_eq!(counted(reporter.summary()), projects);
    }

    #[test]
    fn indefinite_status_never_posts(
        status in prop::sample::select(vec![
            ScenarioStatus::Skipped,
            ScenarioStatus::Undefined,
            ScenarioStatus::Executing,
            ScenarioStatus::Untested,
        ]),
        branch in strategy_branch_name(),
    ) {
        let api = FakeTestRail::new().with_cases(1, [42]);
        let cfg = config(vec![project(1, 11, ".*")]);
        let mut reporter = TestRailReporter::new(branch, &cfg, &api).unwrap();

        let s = scenario("s", &["testrail-C42"], status);
        reporter.feature(&feature("f", &[], vec![FeatureElement::Scenario(s)])).unwrap();

        prop_assert!(api.results().is_empty());
        prop_assert_eq!(reporter.summary().skipped, 1);
    }

    #[test]
    fn one_increment_per_project_and_case_tag(
        status in strategy_scenario_status(),
        extra_tags in prop::collection::vec(strategy_plain_tag(), 0..4),
    ) {
        let api = FakeTestRail::new().with_cases(1, [42]).with_cases(2, [7]);
        let cfg = config(vec![project(1, 11, ".*"), project(2, 22, ".*")]);
        let mut reporter = TestRailReporter::new("master", &cfg, &api).unwrap();

        let mut tags: Vec<&str> = extra_tags.iter().map(String::as_str).collect();
        tags.push("testrail-C42");
        let s = scenario("s", &tags, status);
        reporter.feature(&feature("f", &[], vec![FeatureElement::Scenario(s)])).unwrap();

        prop_assert_eq!(counted(reporter.summary()), 2);
        let posted = ResultStatus::from_scenario(status).is_postable();
        prop_assert_eq!(api.results().len(), usize::from(posted));
    }
}
