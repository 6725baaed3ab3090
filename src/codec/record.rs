//! Record: field name to value mapping for one data row

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{DbError, DbResult};

/// Field name → scalar value view of a row.
///
/// A record is not tied to a header when built; keys are checked against the
/// live header when the record is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overwrites the fields present in `changes`; others keep their values
    pub fn merge(&mut self, changes: &Record) {
        for (field, value) in changes.iter() {
            self.fields.insert(field.to_string(), value.clone());
        }
    }

    /// Copy holding only the listed fields that are present
    pub fn project<S: AsRef<str>>(&self, fields: &[S]) -> Record {
        fields
            .iter()
            .filter_map(|f| {
                let f = f.as_ref();
                self.fields.get(f).map(|v| (f.to_string(), v.clone()))
            })
            .collect()
    }

    /// Record as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl TryFrom<Value> for Record {
    type Error = DbError;

    /// Only JSON objects are records
    fn try_from(value: Value) -> DbResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DbError::record_error(format!(
                "A record must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
