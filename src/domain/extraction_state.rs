use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::schema::Schema;

/// Document-scoped best value per field.
///
/// Values only ever go from absent to present, except through
/// [`ExtractionState::overwrite`], which the bulk sanitize pass uses.
#[derive(Debug, Clone, Default)]
pub struct ExtractionState {
    keys: Vec<String>,
    values: HashMap<String, String>,
    composed: HashSet<String>,
}

impl ExtractionState {
    pub fn new(schema: &Schema) -> Self {
        Self {
            keys: schema.keys(),
            ..Self::default()
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_filled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.trim().is_empty())
    }

    /// Stores `value` only when the field is known and still empty.
    pub fn fill_if_absent(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || !self.knows(key) || self.is_filled(key) {
            return false;
        }
        self.values.insert(key.to_string(), value.to_string());
        true
    }

    pub fn overwrite(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || !self.knows(key) {
            return false;
        }
        self.values.insert(key.to_string(), value.to_string());
        true
    }

    /// Flags a field whose geometric value was assembled from several tokens.
    pub fn mark_composed(&mut self, key: &str) {
        if self.knows(key) {
            self.composed.insert(key.to_string());
        }
    }

    pub fn is_composed(&self, key: &str) -> bool {
        self.composed.contains(key)
    }

    pub fn missing_keys(&self) -> Vec<String> {
        self.keys
            .iter()
            .filter(|k| !self.is_filled(k))
            .cloned()
            .collect()
    }

    pub fn missing_or_composed_keys(&self) -> Vec<String> {
        self.keys
            .iter()
            .filter(|k| !self.is_filled(k) || self.is_composed(k))
            .cloned()
            .collect()
    }

    /// Final values in schema order, `null` for anything still empty.
    pub fn into_values(self) -> Map<String, Value> {
        let Self { keys, mut values, .. } = self;
        keys.into_iter()
            .map(|k| {
                let v = values
                    .remove(&k)
                    .filter(|v| !v.trim().is_empty() && !v.eq_ignore_ascii_case("null"))
                    .map(Value::String)
                    .unwrap_or(Value::Null);
                (k, v)
            })
            .collect()
    }

    fn knows(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}
