//! Structural checks on the raw YAML document.
//!
//! Messages follow JSON-schema wording so they read the same as the
//! `Invalid testrail.yml file!` errors users already know.

use serde_yaml::{Mapping, Number, Value};

const PROJECT_FIELDS: [(&str, Kind); 4] = [
    ("id", Kind::Id),
    ("name", Kind::String),
    ("suite_id", Kind::Id),
    ("allowed_branch_pattern", Kind::String),
];

#[derive(Debug, Clone, Copy)]
enum Kind {
    String,
    Id,
}

/// True when the document has no usable `projects` entry at all.
pub(crate) fn has_no_projects(doc: &Value) -> bool {
    let Value::Mapping(root) = doc else {
        return false;
    };
    match root.get("projects") {
        None | Some(Value::Null) => true,
        Some(Value::Sequence(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// First schema violation found, as a message.
pub(crate) fn validate_document(doc: &Value) -> Result<(), String> {
    let Value::Mapping(root) = doc else {
        return Err(type_error(doc, "object", None));
    };

    let base_url = required(root, "base_url", None)?;
    check_kind(base_url, Kind::String, Some("base_url"))?;

    let projects = required(root, "projects", None)?;
    let Value::Sequence(items) = projects else {
        return Err(type_error(projects, "array", Some("projects")));
    };

    for (i, item) in items.iter().enumerate() {
        let at = format!("projects[{i}]");
        let Value::Mapping(project) = item else {
            return Err(type_error(item, "object", Some(&at)));
        };
        for (field, kind) in PROJECT_FIELDS {
            let value = required(project, field, Some(&at))?;
            check_kind(value, kind, Some(&format!("{at}.{field}")))?;
        }
    }

    if let Some(timeout) = root.get("timeout_seconds") {
        match timeout {
            Value::Null => {}
            Value::Number(n) if n.as_u64().is_some_and(|t| t > 0) => {}
            other => {
                return Err(format!(
                    "{} is not a positive whole number of seconds (at timeout_seconds)",
                    describe(other)
                ));
            }
        }
    }

    if let Some(Value::String(url)) = root.get("base_url") {
        check_url(url)?;
    }

    Ok(())
}

fn required<'a>(map: &'a Mapping, key: &str, at: Option<&str>) -> Result<&'a Value, String> {
    map.get(key)
        .ok_or_else(|| with_location(format!("'{key}' is a required property"), at))
}

fn check_kind(value: &Value, kind: Kind, at: Option<&str>) -> Result<(), String> {
    match (kind, value) {
        (Kind::String, Value::String(_)) => Ok(()),
        (Kind::String, other) => Err(type_error(other, "string", at)),
        (Kind::Id, Value::Number(n)) if whole_id(n).is_some() => Ok(()),
        (Kind::Id, Value::Number(n)) => Err(with_location(
            format!("{n} is not a valid TestRail id"),
            at,
        )),
        (Kind::Id, other) => Err(type_error(other, "number", at)),
    }
}

/// Ids are schema `number`s; `1.0` names the same project as `1`.
fn whole_id(n: &Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Rewrite whole-valued float ids as integers. Run after validation.
pub(crate) fn normalize_ids(doc: &mut Value) {
    let Some(Value::Sequence(items)) = doc.get_mut("projects") else {
        return;
    };
    for item in items {
        for (field, kind) in PROJECT_FIELDS {
            if !matches!(kind, Kind::Id) {
                continue;
            }
            if let Some(value) = item.get_mut(field)
                && let Value::Number(n) = value
                && let Some(id) = whole_id(n)
            {
                *value = Value::Number(Number::from(id));
            }
        }
    }
}

fn check_url(raw: &str) -> Result<(), String> {
    match url::Url::parse(raw) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => Ok(()),
        _ => Err(with_location(
            format!("'{raw}' is not a valid http(s) URL"),
            Some("base_url"),
        )),
    }
}

fn type_error(value: &Value, expected: &str, at: Option<&str>) -> String {
    with_location(
        format!("{} is not of type '{expected}'", describe(value)),
        at,
    )
}

fn with_location(message: String, at: Option<&str>) -> String {
    match at {
        Some(at) => format!("{message} (at {at})"),
        None => message,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{s}'"),
        Value::Sequence(_) => "[...]".to_string(),
        Value::Mapping(_) => "{...}".to_string(),
        Value::Tagged(tagged) => describe(&tagged.value),
    }
}
