//! Structured-tag form for on-disk and item persistence.
//!
//! A `CompoundTag` is a string-keyed record, stored as a JSON object so it
//! can be written to disk with `serde_json` and handed to the host's
//! persistent-data store unchanged.

use crate::error::CodecError;
use crate::id::ResourceId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named-field record in the persisted form.
///
/// # Examples
///
/// ```rust
/// use skilltree::CompoundTag;
///
/// let mut tag = CompoundTag::new();
/// tag.put_f32("amount", 1.5);
/// tag.put_string("operation", "addition");
///
/// assert_eq!(tag.get_f32("amount").unwrap(), 1.5);
/// assert!(tag.get_i32("sockets").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompoundTag(Map<String, Value>);

impl CompoundTag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret an arbitrary JSON value as a record.
    pub fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CodecError::InvalidField {
                field: "<record>".to_string(),
                reason: format!("expected object, found {other}"),
            }),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(json).map_err(|e| CodecError::InvalidField {
            field: "<record>".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn put_string(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn put_id(&mut self, key: &str, value: &ResourceId) {
        self.put_string(key, value.as_str());
    }

    pub fn put_i32(&mut self, key: &str, value: i32) {
        self.0.insert(key.to_string(), Value::from(value));
    }

    pub fn put_f32(&mut self, key: &str, value: f32) {
        self.put_f64(key, f64::from(value));
    }

    pub fn put_f64(&mut self, key: &str, value: f64) {
        // Non-finite numbers have no JSON form and are stored as null.
        self.0.insert(key.to_string(), Value::from(value));
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.0.insert(key.to_string(), Value::Bool(value));
    }

    pub fn put_compound(&mut self, key: &str, value: CompoundTag) {
        self.0.insert(key.to_string(), Value::Object(value.0));
    }

    pub fn put_list(&mut self, key: &str, values: Vec<CompoundTag>) {
        let list = values.into_iter().map(|tag| Value::Object(tag.0)).collect();
        self.0.insert(key.to_string(), Value::Array(list));
    }

    pub fn put_id_list(&mut self, key: &str, values: &[ResourceId]) {
        let list = values
            .iter()
            .map(|id| Value::String(id.as_str().to_string()))
            .collect();
        self.0.insert(key.to_string(), Value::Array(list));
    }

    fn get(&self, key: &str) -> Result<&Value, CodecError> {
        self.0
            .get(key)
            .ok_or_else(|| CodecError::MissingField(key.to_string()))
    }

    fn invalid(key: &str, expected: &str) -> CodecError {
        CodecError::InvalidField {
            field: key.to_string(),
            reason: format!("expected {expected}"),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<&str, CodecError> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| Self::invalid(key, "string"))
    }

    pub fn get_id(&self, key: &str) -> Result<ResourceId, CodecError> {
        ResourceId::parse(self.get_string(key)?)
    }

    pub fn get_i32(&self, key: &str) -> Result<i32, CodecError> {
        self.get(key)?
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| Self::invalid(key, "32-bit integer"))
    }

    pub fn get_f64(&self, key: &str) -> Result<f64, CodecError> {
        self.get(key)?
            .as_f64()
            .ok_or_else(|| Self::invalid(key, "number"))
    }

    pub fn get_f32(&self, key: &str) -> Result<f32, CodecError> {
        Ok(self.get_f64(key)? as f32)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, CodecError> {
        self.get(key)?
            .as_bool()
            .ok_or_else(|| Self::invalid(key, "boolean"))
    }

    pub fn get_compound(&self, key: &str) -> Result<CompoundTag, CodecError> {
        match self.get(key)? {
            Value::Object(map) => Ok(Self(map.clone())),
            _ => Err(Self::invalid(key, "record")),
        }
    }

    /// Raw list entries; callers decide how to treat non-record entries.
    pub fn get_array(&self, key: &str) -> Result<&[Value], CodecError> {
        self.get(key)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| Self::invalid(key, "list"))
    }

    /// Every entry must be a record.
    pub fn get_list(&self, key: &str) -> Result<Vec<CompoundTag>, CodecError> {
        self.get_array(key)?
            .iter()
            .map(|value| CompoundTag::from_value(value.clone()))
            .collect()
    }

    pub fn get_id_list(&self, key: &str) -> Result<Vec<ResourceId>, CodecError> {
        self.get_array(key)?
            .iter()
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| Self::invalid(key, "list of identifiers"))
                    .and_then(ResourceId::parse)
            })
            .collect()
    }

    /// Absent key reads as `None`; a present but malformed one is an error.
    pub fn get_optional_f32(&self, key: &str) -> Result<Option<f32>, CodecError> {
        if self.contains(key) {
            self.get_f32(key).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn get_optional_id(&self, key: &str) -> Result<Option<ResourceId>, CodecError> {
        if self.contains(key) {
            self.get_id(key).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl From<CompoundTag> for Value {
    fn from(tag: CompoundTag) -> Self {
        Value::Object(tag.0)
    }
}
