//! Cache Key Module
//!
//! Defines the attribute bag used as a request and the deterministic key
//! derivation built on it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CacheError, Result};

// == Request ==
/// A set of named attributes describing what a caller wants.
///
/// Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Request {
    attributes: Map<String, Value>,
}

impl Request {
    // == Constructor ==
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    // == From JSON ==
    /// Builds a request from a JSON object.
    ///
    /// Anything other than an object is rejected.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(attributes) => Ok(Self { attributes }),
            other => Err(CacheError::InvalidRequest(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    // == With ==
    /// Adds an attribute, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    // == Insert ==
    /// Sets an attribute, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    // == Get ==
    /// Returns the value of an attribute, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    // == Contains ==
    /// Checks if the request carries an attribute.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    // == Sorted Names ==
    /// Attribute names sorted lexicographically by code point.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // == Length ==
    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    // == Is Empty ==
    /// Returns true if the request has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Request
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut request = Request::new();
        for (name, value) in iter {
            request.insert(name, value);
        }
        request
    }
}

// == Key Derivation ==
/// Derives the cache key for `request`.
///
/// With `key_attributes` set (and non-empty) exactly those names are used, in
/// that order. Otherwise every attribute present on the request is used,
/// sorted by name. Each name contributes `[value]`, or `[]` when the request
/// lacks it.
pub fn derive_key(request: &Request, key_attributes: Option<&[String]>) -> String {
    let mut key = String::new();
    match key_attributes {
        Some(names) if !names.is_empty() => {
            for name in names {
                push_slot(&mut key, request.get(name));
            }
        }
        _ => {
            for name in request.sorted_names() {
                push_slot(&mut key, request.get(name));
            }
        }
    }
    key
}

fn push_slot(key: &mut String, value: Option<&Value>) {
    key.push('[');
    if let Some(value) = value {
        render_value(key, value);
    }
    key.push(']');
}

/// Strings render raw, arrays as comma-joined elements, objects as compact JSON.
///
/// Whole-number floats render like integers so `1.0` and `1` share a key.
fn render_value(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => out.push_str(&f.to_string()),
            _ => out.push_str(&n.to_string()),
        },
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // null elements join as empty
                if !item.is_null() {
                    render_value(out, item);
                }
            }
        }
        other => out.push_str(&other.to_string()),
    }
}
