//! The template data value
//!
//! A single tagged union covers every shape template data can take:
//! scalars, sequences, and string-keyed mappings. Dot-paths walk mapping
//! entries; resolution never inspects types at runtime beyond this enum.
//! Mappings are ordered so rendering identical inputs is byte-identical.

use std::collections::BTreeMap;
use std::fmt;

/// A data value supplied to the template engine
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Walk a dot-path (e.g. "Invoice.Customer.Name") into nested mappings
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for key in path.split('.') {
            match current {
                Value::Map(map) => current = map.get(key)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Truthiness used by `{{if}}` conditions
    ///
    /// Null is false; booleans are themselves; strings are false when
    /// empty, "false", or "0"; numbers are false when zero; sequences and
    /// mappings are true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Str(s) => !(s.is_empty() || s == "false" || s == "0"),
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Seq(_) | Value::Map(_) => true,
        }
    }

    /// The sequence items, if this value is a sequence
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// The mapping entries, if this value is a mapping
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert a parsed JSON value
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a parsed YAML value; non-string mapping keys are stringified
    pub fn from_yaml(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_yaml::Value::String(s) => Value::Str(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Seq(items.into_iter().map(Value::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Value::from_yaml(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => Value::from_yaml(other).to_string(),
    }
}

/// Substitution formatting: integers without a decimal point, Null as empty
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Seq(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> FromIterator<(String, V)> for Value {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_lookup_simple() {
        let value = map_of(&[("Name", Value::from("World"))]);
        assert_eq!(value.lookup("Name"), Some(&Value::from("World")));
        assert_eq!(value.lookup("Missing"), None);
    }

    #[test]
    fn test_lookup_dot_path() {
        let inner = map_of(&[("Name", Value::from("ACME"))]);
        let value = map_of(&[("Customer", inner)]);

        assert_eq!(value.lookup("Customer.Name"), Some(&Value::from("ACME")));
        assert_eq!(value.lookup("Customer.Missing"), None);
        // Paths cannot walk into scalars
        assert_eq!(value.lookup("Customer.Name.Deeper"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::from("false").is_truthy());
        assert!(!Value::from("0").is_truthy());
        assert!(Value::from("yes").is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Int(-3).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::Seq(vec![]).is_truthy());
        assert!(Value::Map(BTreeMap::new()).is_truthy());
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(Value::Int(10).to_string(), "10");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("text").to_string(), "text");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"Name": "A", "Price": 10, "Rate": 0.5, "Tags": ["x"]}"#)
                .unwrap();
        let value = Value::from_json(json);

        assert_eq!(value.lookup("Name"), Some(&Value::from("A")));
        assert_eq!(value.lookup("Price"), Some(&Value::Int(10)));
        assert_eq!(value.lookup("Rate"), Some(&Value::Float(0.5)));
        assert_eq!(
            value.lookup("Tags"),
            Some(&Value::Seq(vec![Value::from("x")]))
        );
    }

    #[test]
    fn test_from_yaml() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("Name: B\nCount: 3\nPaid: true").unwrap();
        let value = Value::from_yaml(yaml);

        assert_eq!(value.lookup("Name"), Some(&Value::from("B")));
        assert_eq!(value.lookup("Count"), Some(&Value::Int(3)));
        assert_eq!(value.lookup("Paid"), Some(&Value::Bool(true)));
    }
}
