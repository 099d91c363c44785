use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered field key → description mapping. Only the keys drive extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Map<String, Value>);

impl Schema {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(|k| (k.into(), Value::Null)).collect())
    }

    /// Accepts an object, a JSON string holding an object, or anything else
    /// (which yields an empty schema).
    pub fn parse(raw: &Value) -> Self {
        match raw {
            Value::Object(map) => Self(map.clone()),
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => Self(map),
                _ => Self::default(),
            },
            _ => Self::default(),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The subset of keys, each mapped to `null`, in the given order.
    pub fn nulled(keys: &[String]) -> Map<String, Value> {
        keys.iter().map(|k| (k.clone(), Value::Null)).collect()
    }
}
