//! Record parsing and field mappings
//!
//! Incoming flowfile content is UTF-8 JSON: either a single object or an
//! array of objects. Both normalize to an ordered sequence of [`Record`]s.
//! A [`FieldMapping`] declares which incoming fields are compared against
//! which reference columns.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Error, Result};

/// A record: mapping from field name to scalar JSON value
pub type Record = serde_json::Map<String, Value>;

/// Parse flowfile content into an ordered sequence of records.
///
/// A single JSON object is normalized to a one-element sequence; a JSON
/// array must contain only objects. Anything else fails the invocation.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(Error::InvalidContent {
                    message: format!("expected an array of objects, found {}", kind_name(&other)),
                }),
            })
            .collect(),
        other => Err(Error::InvalidContent {
            message: format!(
                "expected a JSON object or array of objects, found {}",
                kind_name(&other)
            ),
        }),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Mapping from incoming-record field names to reference-record column names
///
/// Keys are unique (the same incoming field cannot map to two columns) and
/// iteration order is irrelevant to classification. An empty mapping is
/// valid; see [`crate::classify::classify`] for its effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    pairs: HashMap<String, String>,
}

impl FieldMapping {
    /// Parse a mapping from its JSON-encoded form.
    ///
    /// The document must be a JSON object whose values are all strings,
    /// e.g. `{"id": "order_id", "name": "customer_name"}`.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidMapping {
            message: e.to_string(),
        })?;
        let object = value.as_object().ok_or_else(|| Error::InvalidMapping {
            message: "mapping must be a JSON object".to_string(),
        })?;

        let mut pairs = HashMap::with_capacity(object.len());
        for (field, column) in object {
            let column = column.as_str().ok_or_else(|| Error::InvalidMapping {
                message: format!("column name for field '{}' must be a string", field),
            })?;
            pairs.insert(field.clone(), column.to_string());
        }
        Ok(Self { pairs })
    }

    /// Build a mapping from (field, column) pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(f, c)| (f.into(), c.into()))
                .collect(),
        }
    }

    /// Iterate over (incoming field, reference column) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(f, c)| (f.as_str(), c.as_str()))
    }

    /// Number of compared field pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the mapping compares no fields at all
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Canonical string form of a record field, used for comparison.
///
/// A missing field and an explicit JSON `null` share one sentinel, so two
/// records both lacking the compared field are equal on that field. Both
/// sides of every comparison go through this conversion, which is what
/// makes the integer `5` equal the string `"5"`.
pub fn canonical_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed("null"),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(b)) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        // Nested values are rare in record data; compare their compact JSON.
        Some(other) => Cow::Owned(other.to_string()),
    }
}
