//! Structured view of a parsed export payload
//!
//! The companion app sends objects, arrays or (rarely) bare scalars. The
//! export label used in file names is inferred from the payload first and the
//! request path second.

use crate::path::{PathMetadata, WEEK_MARKER};
use serde_json::{Map, Value};

/// Label used when an object carries no usable type information
pub const OBJECT_LABEL: &str = "object";

/// Label used when nothing else applies
pub const UNKNOWN_LABEL: &str = "unknown";

/// A JSON payload split by shape
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    Scalar(Value),
}

impl Payload {
    /// Parse raw request bytes as any JSON value
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from(value))
    }

    /// Look up a non-null field on an object payload
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Payload::Object(map) => map.get(name).filter(|v| !v.is_null()),
            _ => None,
        }
    }

    /// Top-level keys of an object payload, empty for other shapes
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Payload::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Infer the export label for file naming.
    ///
    /// Order: `exportType` field, `type` field, path data type, path export
    /// type (unless it is the week marker), `array_<len>`, then a shape
    /// fallback. The first non-empty candidate wins.
    pub fn export_label(&self, metadata: &PathMetadata) -> String {
        let candidates = [
            self.field("exportType").map(stringify),
            self.field("type").map(stringify),
            Some(metadata.data_type.clone()),
            Some(metadata.export_type.clone()).filter(|t| t != WEEK_MARKER),
            match self {
                Payload::Array(items) => Some(format!("array_{}", items.len())),
                _ => None,
            },
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|label| !label.is_empty())
            .unwrap_or_else(|| self.fallback_label().to_string())
    }

    fn fallback_label(&self) -> &'static str {
        match self {
            Payload::Object(_) => OBJECT_LABEL,
            _ => UNKNOWN_LABEL,
        }
    }

    /// Serialize with two-space indentation
    pub fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Payload::Object(map) => serde_json::to_vec_pretty(map),
            Payload::Array(items) => serde_json::to_vec_pretty(items),
            Payload::Scalar(value) => serde_json::to_vec_pretty(value),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Payload::Object(map),
            Value::Array(items) => Payload::Array(items),
            other => Payload::Scalar(other),
        }
    }
}

/// Render a JSON value as a label: strings verbatim, everything else as JSON text
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
