//! Permissive scalar coercion for raw document values.
//!
//! Input documents are hand-written YAML, so scalars arrive in whatever shape
//! the author typed: `on`, `"1"`, `8`, `"8MB"`. These helpers fold them into
//! the types the normalizer wants, returning `None` for null/absent so the
//! caller can apply its own default.

use serde_yaml_ng::Value;

const TRUE_STRINGS: &[&str] = &["true", "yes", "1", "on"];
const FALSE_STRINGS: &[&str] = &["false", "no", "0", "off"];

pub fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let lowered = s.trim().to_lowercase();
            if TRUE_STRINGS.contains(&lowered.as_str()) {
                Some(true)
            } else if FALSE_STRINGS.contains(&lowered.as_str()) {
                Some(false)
            } else {
                Some(!s.is_empty())
            }
        }
        Value::Number(n) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(true)),
        Value::Sequence(s) => Some(!s.is_empty()),
        Value::Mapping(m) => Some(!m.is_empty()),
        _ => Some(true),
    }
}

pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn parse_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn parse_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Sequence(items)) => items.iter().filter_map(parse_string).collect(),
        _ => Vec::new(),
    }
}
