//! Fuzz harness for Cucumber JSON results.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(features) = railreport_ingest_cucumber::parse_cucumber_json(input) {
        for feature in &features {
            // every element yields at least one scenario
            assert!(feature.scenarios().count() >= feature.elements.len());
        }
    }
});
