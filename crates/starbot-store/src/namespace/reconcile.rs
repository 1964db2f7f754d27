//! Schema healing
//!
//! A stored document is reconciled against the namespace's default shape:
//! every key present in the defaults must exist in the stored document with
//! a value of the same JSON kind. Missing or mistyped values are replaced by
//! the default; nested objects are reconciled key by key. Keys only present
//! in the stored document are kept untouched.
//!
//! Integers and floats are distinct kinds. A `null` default means
//! "optional": any stored kind is accepted there.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

fn kind(value: &Value) -> Kind {
    match value {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Bool,
        Value::Number(n) if n.is_i64() || n.is_u64() => Kind::Integer,
        Value::Number(_) => Kind::Float,
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Object,
    }
}

/// Heal `stored` in place against `defaults`
///
/// Returns the dotted paths of every value that was replaced by its default,
/// in the order of the defaults. An empty result means the stored document
/// already matched.
pub fn reconcile(stored: &mut Map<String, Value>, defaults: &Map<String, Value>) -> Vec<String> {
    let mut healed = Vec::new();
    reconcile_at(stored, defaults, "", &mut healed);
    healed
}

fn reconcile_at(
    stored: &mut Map<String, Value>,
    defaults: &Map<String, Value>,
    prefix: &str,
    healed: &mut Vec<String>,
) {
    for (key, default) in defaults {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(value) = stored.get_mut(key) {
            if default.is_null() {
                continue;
            }
            match (value, default) {
                (Value::Object(inner), Value::Object(inner_defaults)) => {
                    reconcile_at(inner, inner_defaults, &path, healed);
                }
                (value, default) if kind(value) != kind(default) => {
                    *value = default.clone();
                    healed.push(path);
                }
                _ => {}
            }
        } else {
            stored.insert(key.clone(), default.clone());
            healed.push(path);
        }
    }
}
