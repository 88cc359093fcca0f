use crate::entity::Entity;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Text form of a scalar used for free-text matching
///
/// Nulls, arrays and objects are not searchable.
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Check whether an entity matches a free-text filter
///
/// The filter is split on whitespace; every term must appear
/// (case-insensitively) in at least one field. Blank filters match all.
pub fn matches(entity: &Entity, filter: &str) -> bool {
    let rendered: Vec<String> = entity
        .fields()
        .filter_map(|(_, v)| render_value(v))
        .map(|s| s.to_lowercase())
        .collect();

    filter
        .split_whitespace()
        .map(str::to_lowercase)
        .all(|term| rendered.iter().any(|field| field.contains(&term)))
}

/// Keep the entities matching `filter`, preserving their order
pub fn apply_filter<'a>(items: &'a [Entity], filter: Option<&str>) -> Vec<&'a Entity> {
    match filter {
        Some(text) if !text.trim().is_empty() => {
            items.iter().filter(|e| matches(e, text)).collect()
        }
        _ => items.iter().collect(),
    }
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(_) => 4,
    }
}

// Integers compare exactly; anything involving a float goes through f64
fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    match (x.as_i64(), y.as_i64(), x.as_u64(), y.as_u64()) {
        (Some(a), Some(b), _, _) => a.cmp(&b),
        (_, _, Some(a), Some(b)) => a.cmp(&b),
        // Negative i64 against a u64 above i64::MAX
        (Some(_), None, None, Some(_)) => Ordering::Less,
        (None, Some(_), Some(_), None) => Ordering::Greater,
        _ => {
            let a = x.as_f64().unwrap_or(0.0);
            let b = y.as_f64().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
    }
}

/// Total order over field values used by the table sort
///
/// Missing/null < bool < number < string < composite. Strings compare
/// case-insensitively first, then by raw text so the order stays total.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => compare_numbers(x, y),
        (Some(Value::String(x)), Some(Value::String(y))) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        _ => rank(a).cmp(&rank(b)),
    }
}
