//! Functions exposed to templates

use std::fmt::Write;

use minijinja::value::Value;
use minijinja::{Error, ErrorKind};

/// Upper-case the first character.
pub fn title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Today's local date in strftime `format`.
pub fn date(format: &str) -> Result<String, Error> {
    let mut out = String::new();
    write!(out, "{}", chrono::Local::now().format(format)).map_err(|_| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date format {:?}", format),
        )
    })?;
    Ok(out)
}

/// Drop the namespace qualification of a name. `::` inside a template argument
/// list does not count, so `std::vector<ui::Button>` becomes `vector<ui::Button>`.
pub fn strip_namespace(s: &str) -> String {
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    s[start..].to_string()
}

fn item_matches(item: &Value, conditions: &[(&str, &Value)]) -> Result<bool, Error> {
    for (key, expected) in conditions {
        let actual = item.get_attr(key)?;
        if actual.is_undefined() || &actual != *expected {
            return Ok(false);
        }
    }
    Ok(true)
}

fn query(items: &Value, conditions: &[(&str, &Value)]) -> Result<Vec<Value>, Error> {
    let mut found = Vec::new();
    for item in items.try_iter()? {
        if item_matches(&item, conditions)? {
            found.push(item);
        }
    }
    Ok(found)
}

pub fn count_property(items: Value, key: &str, value: Value) -> Result<usize, Error> {
    Ok(query(&items, &[(key, &value)])?.len())
}

pub fn count_property2(
    items: Value,
    key0: &str,
    value0: Value,
    key1: &str,
    value1: Value,
) -> Result<usize, Error> {
    Ok(query(&items, &[(key0, &value0), (key1, &value1)])?.len())
}

pub fn query_property(items: Value, key: &str, value: Value) -> Result<Value, Error> {
    Ok(Value::from(query(&items, &[(key, &value)])?))
}

pub fn query_property2(
    items: Value,
    key0: &str,
    value0: Value,
    key1: &str,
    value1: Value,
) -> Result<Value, Error> {
    Ok(Value::from(query(&items, &[(key0, &value0), (key1, &value1)])?))
}
