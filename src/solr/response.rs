//! JSON shapes returned by the `terms` and `select` handlers.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Opaque firm key. Numeric ids are kept in their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmId(String);

impl FirmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            Value::Array(values) => values.first().and_then(Self::from_value),
            _ => None,
        }
    }
}

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{"terms": {"<field>": ["term", count, "term", count, ...]}}`
#[derive(Debug, Deserialize)]
pub struct TermsResponse {
    pub terms: HashMap<String, Vec<Value>>,
}

impl TermsResponse {
    /// Pair up the flat term/count list of `field`.
    pub fn term_counts(&self, field: &str) -> Result<Vec<(String, u64)>, String> {
        let flat = self
            .terms
            .get(field)
            .ok_or_else(|| format!("no terms for field {field:?}"))?;
        if flat.len() % 2 != 0 {
            return Err(format!(
                "odd number of entries ({}) in terms list for {field:?}",
                flat.len()
            ));
        }

        flat.chunks_exact(2)
            .map(|pair| -> Result<(String, u64), String> {
                let term = pair[0]
                    .as_str()
                    .ok_or_else(|| format!("term {} is not a string", pair[0]))?;
                let count = pair[1]
                    .as_u64()
                    .ok_or_else(|| format!("count {} for {term:?} is not a non-negative integer", pair[1]))?;
                Ok((term.to_string(), count))
            })
            .collect()
    }
}

/// `{"response": {"numFound": n, "docs": [...]}}`
#[derive(Debug, Deserialize)]
pub struct SelectResponse {
    pub response: DocList,
}

#[derive(Debug, Deserialize)]
pub struct DocList {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    pub docs: Vec<Map<String, Value>>,
}

pub fn firm_id(doc: &Map<String, Value>, field: &str) -> Option<FirmId> {
    doc.get(field).and_then(FirmId::from_value)
}

/// Text of a stored field. Multi-valued fields are joined with a space.
pub fn text(doc: &Map<String, Value>, field: &str) -> Option<String> {
    match doc.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(values) => Some(
            values
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    }
}
