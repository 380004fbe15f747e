//! Template data loading
//!
//! Data is a top-level mapping of variable names to values. When loaded
//! from disk the bytes are tried as JSON first, then as YAML.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, TemplateError};
use crate::value::Value;

/// The top-level mapping driving a render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateData {
    entries: BTreeMap<String, Value>,
}

impl TemplateData {
    /// An empty data set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Resolve a dot-path against the top-level mapping
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let value = self.entries.get(head)?;
        match rest {
            Some(rest) => value.lookup(rest),
            None => Some(value),
        }
    }

    /// Top-level variable names
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Iterate over top-level entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of top-level variables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no variables
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from any value that is a mapping
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(entries) => Ok(Self { entries }),
            _ => Err(TemplateError::NotAMapping),
        }
    }

    /// Parse JSON bytes holding a top-level object
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        Self::from_value(Value::from_json(json))
    }

    /// Parse YAML bytes holding a top-level mapping
    pub fn from_yaml_slice(bytes: &[u8]) -> Result<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_slice(bytes)?;
        Self::from_value(Value::from_yaml(yaml))
    }

    /// Load data from a file, trying JSON first and YAML second
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        match Self::from_json_slice(&bytes) {
            Ok(data) => Ok(data),
            Err(TemplateError::NotAMapping) => Err(TemplateError::NotAMapping),
            Err(_) => Self::from_yaml_slice(&bytes),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TemplateData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
