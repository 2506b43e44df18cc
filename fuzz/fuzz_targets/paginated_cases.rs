//! Fuzz harness for list responses: the first page is the fuzz input, and
//! any `_links.next` it names answers with an empty last page.

#![no_main]

use libfuzzer_sys::fuzz_target;
use railreport_api::{ApiError, RawResponse, TestRailClient, Transport};
use serde_json::Value;

struct OnePage(String);

impl Transport for OnePage {
    fn get(&self, url: &str) -> Result<RawResponse, ApiError> {
        let body = if url.ends_with("get_cases/1&suite_id=2") {
            self.0.clone()
        } else {
            "[]".to_string()
        };
        Ok(RawResponse { status: 200, body })
    }

    fn post(&self, _url: &str, _body: &Value) -> Result<RawResponse, ApiError> {
        Ok(RawResponse {
            status: 405,
            body: String::new(),
        })
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(client) = TestRailClient::with_transport("https://fuzz.testrail.io", OnePage(input.to_string()))
    else {
        return;
    };
    let _ = client.get_cases(1, 2);
});
