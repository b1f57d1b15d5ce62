//! The consumed JSON primitive, as a thin adapter over `serde_json`.
//!
//! The engine only needs a handful of capabilities from its JSON layer:
//! total parsing, one canonical empty document (the literal `"{}"`), and
//! read-by-path returning scalars or lists. `JsonDoc` provides exactly
//! that surface and nothing more.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::num;

/// An immutable JSON document view.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDoc {
    value: Value,
}

impl Default for JsonDoc {
    fn default() -> Self {
        Self::empty()
    }
}

impl JsonDoc {
    /// The canonical empty document, equal to parsing `"{}"`.
    pub fn empty() -> Self {
        JsonDoc {
            value: Value::Object(Map::new()),
        }
    }

    /// Parse `text` into a document. Total: blank or unparseable input
    /// yields the canonical empty document.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::empty();
        }
        match serde_json::from_str(trimmed) {
            Ok(value) => JsonDoc { value },
            Err(err) => {
                debug!(%err, "unparseable json, degrading to empty document");
                Self::empty()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        JsonDoc { value }
    }

    /// True for the canonical empty document.
    pub fn is_empty_doc(&self) -> bool {
        matches!(&self.value, Value::Object(map) if map.is_empty())
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn to_json_string(&self) -> String {
        self.value.to_string()
    }

    /// Read a value by dotted path with optional `[n]` index segments and
    /// an optional leading `$.`. `"a.b[2].c"` walks object key `a`, index
    /// 2 of array `b`, then key `c`. Misses return `None`.
    pub fn read(&self, path: &str) -> Option<&Value> {
        let mut current = &self.value;
        for segment in split_path(path) {
            let (name, indexes) = parse_segment(segment)?;
            if !name.is_empty() {
                current = current.get(name)?;
            }
            for index in indexes {
                current = current.get(index)?;
            }
        }
        Some(current)
    }

    /// Read a scalar as text. Misses, nulls and non-scalar values yield
    /// the empty string.
    pub fn read_string(&self, path: &str) -> String {
        match self.read(path) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Read a value and push its text through the numeric extractor.
    pub fn read_number(&self, path: &str) -> Option<f64> {
        num::extract_number(&self.read_string(path))
    }

    /// Read a value and deserialize it into `T`. Misses and shape
    /// mismatches yield `None`.
    pub fn read_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.read(path)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let stripped = path
        .strip_prefix('$')
        .map(|rest| rest.strip_prefix('.').unwrap_or(rest))
        .unwrap_or(path);
    stripped.split('.').filter(|s| !s.is_empty())
}

/// Split one path segment into its key name and trailing `[n]` indexes.
/// Returns `None` for malformed brackets, which the caller treats as a
/// miss.
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    match segment.find('[') {
        None => Some((segment, Vec::new())),
        Some(at) => {
            let name = &segment[..at];
            let mut indexes = Vec::new();
            let mut rest = &segment[at..];
            while let Some(stripped) = rest.strip_prefix('[') {
                let close = stripped.find(']')?;
                indexes.push(stripped[..close].parse().ok()?);
                rest = &stripped[close + 1..];
            }
            if rest.is_empty() {
                Some((name, indexes))
            } else {
                None
            }
        }
    }
}
