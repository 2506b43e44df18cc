//! Page handling for TestRail list endpoints.
//!
//! Since TestRail 6.7 list endpoints answer with an envelope:
//!
//! ```json
//! {"offset": 0, "limit": 250, "size": 250,
//!  "_links": {"next": "/api/v2/get_cases/1&suite_id=2&offset=250", "prev": null},
//!  "cases": [ ... ]}
//! ```
//!
//! Older servers return a bare array. Both shapes are accepted.

use serde_json::Value;

const API_PREFIX: &str = "/api/v2/";

#[derive(Debug, PartialEq)]
pub(crate) struct Page {
    pub items: Vec<Value>,
    /// URI of the next page, relative to the API root.
    pub next: Option<String>,
}

/// Split one response into its items and the link to the next page.
pub(crate) fn parse_page(body: Value, items_key: &str) -> Result<Page, String> {
    match body {
        Value::Array(items) => Ok(Page { items, next: None }),
        Value::Object(mut obj) => {
            let items = match obj.remove(items_key) {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(format!("`{items_key}` is not an array")),
                None => return Err(format!("missing `{items_key}`")),
            };
            let next = obj
                .get("_links")
                .and_then(|links| links.get("next"))
                .and_then(Value::as_str)
                .filter(|next| !next.is_empty())
                .map(next_uri);
            Ok(Page { items, next })
        }
        other => Err(format!("expected an object or array, got {}", kind(&other))),
    }
}

/// Re-root a `_links.next` path under the API root.
///
/// `/api/v2/get_runs/1&offset=250` becomes `get_runs/1&offset=250`.
pub(crate) fn next_uri(link: &str) -> String {
    match link.find(API_PREFIX) {
        Some(idx) => link[idx + API_PREFIX.len()..].to_string(),
        None => link.trim_start_matches('/').to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
