//! Variables collected from the user during one run.

use serde_json::{Map, Value};

/// Accumulates answers across the commands of a program.
///
/// Later prompts never drop earlier answers: new values are merged on top of
/// the existing ones, so every render sees everything collected so far.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Variables {
    values: Map<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `answers` into the store, replacing values of repeated keys.
    pub fn update(&mut self, answers: Map<String, Value>) {
        for (key, value) in answers {
            self.values.insert(key, value);
        }
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forgets every collected value.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    /// Returns the variables as a rendering context.
    pub fn to_context(&self) -> Value {
        Value::Object(self.values.clone())
    }
}
