//! Core data types shared across sources, suggesters, and results.

use serde::{Deserialize, Serialize};

/// A single weighted suggestion entry produced by a build source.
///
/// Immutable once created. The payload is opaque: it is returned verbatim
/// from lookups and never participates in matching or ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Surface text to suggest.
    pub text: String,
    /// Ranking weight; higher sorts first.
    pub weight: i64,
    /// Opaque payload bytes attached to the suggestion.
    pub payload: Vec<u8>,
}

impl Entry {
    /// Create an entry from text, weight, and payload.
    pub fn new(text: impl Into<String>, weight: i64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            text: text.into(),
            weight,
            payload: payload.into(),
        }
    }
}

/// One span of a highlighted result, tagged as matched or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// The span text, a substring of the result's display text.
    pub text: String,
    /// True if this span matched the query.
    pub is_hit: bool,
}

impl Fragment {
    /// A non-matching span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_hit: false,
        }
    }

    /// A matching span.
    pub fn hit(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_hit: true,
        }
    }
}

/// A single ranked suggestion returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// The suggested surface text.
    pub key: String,
    /// The entry's weight.
    pub weight: i64,
    /// The entry's payload, verbatim.
    pub payload: Vec<u8>,
    /// Highlight spans over `key`; populated only by infix suggesters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<Fragment>,
}

/// A stored field value read from a document store collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text content.
    Text(String),
    /// 64-bit integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
}

impl FieldValue {
    /// Returns the text value if this is a Text variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns this value as an integer, truncating floats toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Int64(i) => Some(*i),
            FieldValue::Float64(f) => Some(f.trunc() as i64),
            _ => None,
        }
    }

    /// Returns the float value if this is a numeric variant.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float64(f) => Some(*f),
            FieldValue::Int64(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int64(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float64(v)
    }
}
