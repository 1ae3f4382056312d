//! Shaped records
//!
//! A `ShapedRecord` wraps one anime node from the provider together with the
//! fields that were asked for. Only those fields can be read back, even when
//! the provider sent more; a requested field the provider left out reads as
//! `None`.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::fields::FieldSelection;

#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRecord {
    backing: Map<String, Value>,
    queried: Vec<String>,
}

impl ShapedRecord {
    /// Wrap a provider node. Fails if the node is not a JSON object.
    pub fn from_node(node: Value, fields: &FieldSelection) -> Result<Self> {
        match node {
            Value::Object(backing) => Ok(Self {
                backing,
                queried: fields.as_slice().to_vec(),
            }),
            other => Err(Error::MalformedResponse(format!(
                "expected anime object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Read a requested field.
    ///
    /// `Ok(None)` when the field was requested but not returned;
    /// `FieldNotRequested` when it was never requested.
    pub fn get(&self, name: &str) -> Result<Option<&Value>> {
        if !self.queried.iter().any(|q| q == name) {
            return Err(Error::FieldNotRequested(name.to_owned()));
        }
        Ok(self.backing.get(name))
    }

    /// Requested fields, in request order.
    pub fn queried(&self) -> &[String] {
        &self.queried
    }

    pub fn id(&self) -> Option<u64> {
        self.get("id").ok().flatten().and_then(Value::as_u64)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").ok().flatten().and_then(Value::as_str)
    }

    /// Requested fields as a JSON object, missing ones as `null`.
    pub fn to_map(&self) -> Map<String, Value> {
        self.queried
            .iter()
            .map(|name| {
                let value = self.backing.get(name).cloned().unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect()
    }
}

impl Serialize for ShapedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
