//! Typed optional lookups over semi-structured payloads.
//!
//! External producers drift across schema versions, so every lookup returns
//! `None` on absence or type mismatch instead of failing.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Coerce a JSON value into a non-negative integer.
///
/// Integral floats (`3.0`) are accepted; strings, negatives and fractions are not.
pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}

/// Render scalars as text; objects and arrays have no text form.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub trait FieldLookup {
    fn field(&self, key: &str) -> Option<&Value>;

    /// Non-blank string value
    fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn text_field(&self, key: &str) -> Option<String> {
        self.field(key).and_then(coerce_text)
    }

    fn u64_field(&self, key: &str) -> Option<u64> {
        self.field(key).and_then(coerce_u64)
    }

    fn object_field(&self, key: &str) -> Option<&Map<String, Value>> {
        self.field(key).and_then(Value::as_object)
    }

    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.str_field(key))
    }

    fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text_field(key))
    }

    fn first_u64(&self, keys: &[&str]) -> Option<u64> {
        keys.iter().find_map(|key| self.u64_field(key))
    }
}

impl FieldLookup for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }
}

impl FieldLookup for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// Flatten a top-level object into its numeric entries, skipping everything else.
pub fn numeric_entries(value: &Value) -> BTreeMap<String, u64> {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| coerce_u64(v).map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}

/// A named way of reading a value out of a payload.
pub struct Strategy<T> {
    pub name: &'static str,
    pub resolve: fn(&Value) -> Option<T>,
}

/// Try each strategy in order and return the first hit.
pub fn resolve_first<T>(value: &Value, strategies: &[Strategy<T>]) -> Option<T> {
    for strategy in strategies {
        if let Some(found) = (strategy.resolve)(value) {
            tracing::trace!(strategy = strategy.name, "Strategy resolved value");
            return Some(found);
        }
        tracing::debug!(strategy = strategy.name, "Strategy found nothing");
    }
    None
}
