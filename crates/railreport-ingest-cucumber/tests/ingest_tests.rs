use proptest::prelude::*;
use railreport_ingest_cucumber::{CucumberIngestor, aggregate_status, parse_cucumber_json};
use railreport_ports::Ingestor;
use railreport_schema::scenario::{FeatureElement, ScenarioStatus};
use std::io::Write;

const REPORT: &str = r#"[
  {
    "uri": "features/checkout.feature",
    "keyword": "Feature",
    "name": "Checkout",
    "tags": [{"name": "@shop", "line": 1}],
    "elements": [
      {
        "keyword": "Background",
        "type": "background",
        "name": "",
        "steps": [{"keyword": "Given ", "name": "a basket", "result": {"status": "passed", "duration": 1000}}]
      },
      {
        "keyword": "Scenario",
        "type": "scenario",
        "name": "Pay by card",
        "tags": [{"name": "@testrail-C1104", "line": 4}],
        "before": [{"result": {"status": "passed", "duration": 500000000}}],
        "steps": [
          {"keyword": "Given ", "name": "a card", "result": {"status": "passed", "duration": 1000000000}},
          {"keyword": "When ", "name": "I pay", "result": {"status": "failed", "duration": 1500000000, "error_message": "declined"}},
          {"keyword": "Then ", "name": "I get a receipt", "result": {"status": "skipped"}}
        ]
      },
      {
        "keyword": "Scenario Outline",
        "type": "scenario",
        "name": "Totals",
        "tags": [{"name": "@testrail-C7", "line": 10}],
        "steps": [{"keyword": "Then ", "name": "total is 1", "result": {"status": "passed", "duration": 100}}]
      },
      {
        "keyword": "Scenario Outline",
        "type": "scenario",
        "name": "Totals",
        "tags": [{"name": "@testrail-C7", "line": 10}],
        "steps": [{"keyword": "Then ", "name": "total is 2", "result": {"status": "undefined"}}]
      },
      {
        "keyword": "Scenario",
        "type": "scenario",
        "name": "Not run",
        "tags": ["wip"],
        "steps": [{"keyword": "Given ", "name": "nothing"}]
      }
    ]
  }
]"#;

#[test]
fn parses_a_cucumber_report() {
    let features = parse_cucumber_json(REPORT).unwrap();
    assert_eq!(features.len(), 1);

    let feature = &features[0];
    assert_eq!(feature.name, "Checkout");
    assert_eq!(feature.tags, vec!["shop"]);
    assert_eq!(feature.elements.len(), 3, "background skipped, outline rows grouped");

    let FeatureElement::Scenario(card) = &feature.elements[0] else {
        panic!("expected a scenario");
    };
    assert_eq!(card.tags, vec!["testrail-C1104"]);
    assert_eq!(card.status, ScenarioStatus::Failed);
    assert_eq!(card.steps[1].keyword, "When");
    assert_eq!(card.steps[2].status, ScenarioStatus::Skipped);
    assert!((card.duration - 3.0).abs() < 1e-9);

    let FeatureElement::Outline(totals) = &feature.elements[1] else {
        panic!("expected an outline");
    };
    assert_eq!(totals.tags, vec!["testrail-C7"]);
    let statuses: Vec<_> = totals.scenarios.iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![ScenarioStatus::Passed, ScenarioStatus::Undefined]);

    let FeatureElement::Scenario(not_run) = &feature.elements[2] else {
        panic!("expected a scenario");
    };
    assert_eq!(not_run.tags, vec!["wip"]);
    assert_eq!(not_run.status, ScenarioStatus::Skipped);
    assert_eq!(not_run.steps[0].status, ScenarioStatus::Untested);

    let total: f64 = feature.scenarios().map(|s| s.duration).sum();
    assert!((feature.duration - total).abs() < 1e-12);
}

#[test]
fn behave_style_outline_rows_are_grouped() {
    let json = r#"[{"name": "F", "elements": [
        {"keyword": "Scenario Outline", "name": "Add -- @1.1 Examples", "steps": []},
        {"keyword": "Scenario Outline", "name": "Add -- @1.2 Examples", "steps": []},
        {"keyword": "Scenario Outline", "name": "Sub -- @1.1 Examples", "steps": []}
    ]}]"#;
    let features = parse_cucumber_json(json).unwrap();
    let names: Vec<(&str, usize)> = features[0]
        .elements
        .iter()
        .map(|e| match e {
            FeatureElement::Outline(o) => (o.name.as_str(), o.scenarios.len()),
            FeatureElement::Scenario(s) => (s.name.as_str(), 0),
        })
        .collect();
    assert_eq!(names, vec![("Add", 2), ("Sub", 1)]);
}

#[test]
fn non_array_input_is_rejected() {
    let err = parse_cucumber_json(r#"{"name": "F"}"#).unwrap_err();
    assert!(format!("{err:#}").contains("expected a JSON array of features"));
}

#[test]
fn ingestor_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(REPORT.as_bytes()).unwrap();

    let features = CucumberIngestor::new(file.path()).ingest().unwrap();
    assert_eq!(features[0].scenarios().count(), 4);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    let err = CucumberIngestor::new(&path).ingest().unwrap_err();
    assert!(err.to_string().contains("results.json"));
}

fn status() -> impl Strategy<Value = ScenarioStatus> {
    prop::sample::select(ScenarioStatus::ALL.to_vec())
}

proptest! {
    #[test]
    fn any_failed_step_fails_the_scenario(
        mut steps in prop::collection::vec(status(), 0..8),
        hooks in prop::collection::vec(status(), 0..3),
        at in any::<prop::sample::Index>(),
    ) {
        steps.push(ScenarioStatus::Failed);
        let i = at.index(steps.len());
        let last = steps.len() - 1;
        steps.swap(i, last);
        prop_assert_eq!(aggregate_status(&steps, &hooks), ScenarioStatus::Failed);
    }

    #[test]
    fn all_passed_is_passed(n in 1usize..10) {
        let steps = vec![ScenarioStatus::Passed; n];
        prop_assert_eq!(aggregate_status(&steps, &[ScenarioStatus::Passed]), ScenarioStatus::Passed);
    }
}
