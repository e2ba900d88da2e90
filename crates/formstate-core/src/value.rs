//! Dynamic value types for form data
//!
//! A form is a JSON-like tree: questions hold primitives or lists of
//! primitives, groups are maps and recurring groups are lists of maps.

use crate::path::{full_path, Segment};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamic value that can represent any form data
///
/// Serialized untagged so form data reads naturally from JSON or RON
/// (`{"question1": 5, "group1": {"question3": [22.5]}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// No value / null
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// List of values (multi-value answers and recurring groups)
    List(Vec<Value>),
    /// Map of string keys to values (groups)
    Map(ValueMap),
}

/// A map of string keys to dynamic values
///
/// Uses IndexMap to preserve the field order of the form
pub type ValueMap = IndexMap<String, Value>;

/// How far past a list's end a single write may reach
pub const MAX_LIST_PADDING: usize = 1024;

impl Value {
    /// Create an empty map value
    pub fn map() -> Self {
        Value::Map(ValueMap::new())
    }

    /// Create an empty list value
    pub fn list() -> Self {
        Value::List(Vec::new())
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get this value as a mutable list
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get this value as a map
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Check if this value is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    /// Read the nested value at `path`
    ///
    /// Index segments also address map keys spelled as numbers, so
    /// `a.0` reads `{"a": {"0": ..}}` as well as `{"a": [..]}`.
    pub fn get_path(&self, path: &[Segment]) -> Option<&Value> {
        let mut current = self;
        for segment in path {
            current = match (current, segment) {
                (Value::Map(map), Segment::Key(key)) => map.get(key)?,
                (Value::Map(map), Segment::Index(i)) => map.get(&i.to_string())?,
                (Value::List(list), Segment::Index(i)) => list.get(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable variant of [`Value::get_path`]
    pub fn get_path_mut(&mut self, path: &[Segment]) -> Option<&mut Value> {
        let mut current = self;
        for segment in path {
            current = match (current, segment) {
                (Value::Map(map), Segment::Key(key)) => map.get_mut(key)?,
                (Value::Map(map), Segment::Index(i)) => map.get_mut(&i.to_string())?,
                (Value::List(list), Segment::Index(i)) => list.get_mut(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Write `value` at `path`, creating intermediate containers
    ///
    /// Missing or null ancestors become a map when the next segment is a key
    /// and a list when it is an index. Lists are padded with nulls up to the
    /// written index, at most [`MAX_LIST_PADDING`] past their length.
    /// Descending into a primitive is a shape conflict.
    pub fn set_path(&mut self, path: &[Segment], value: Value) -> Result<()> {
        let mut current = self;
        for (depth, segment) in path.iter().enumerate() {
            current = current.slot(segment, &path[..depth])?;
        }
        *current = value;
        Ok(())
    }

    /// Remove and return the value at `path`
    pub fn remove_path(&mut self, path: &[Segment]) -> Option<Value> {
        let (last, parents) = path.split_last()?;
        match (self.get_path_mut(parents)?, last) {
            (Value::Map(map), Segment::Key(key)) => map.shift_remove(key),
            (Value::Map(map), Segment::Index(i)) => map.shift_remove(&i.to_string()),
            (Value::List(list), Segment::Index(i)) if *i < list.len() => Some(list.remove(*i)),
            _ => None,
        }
    }

    /// Child slot for `segment`, created as null if absent; `at` is this value's path
    fn slot(&mut self, segment: &Segment, at: &[Segment]) -> Result<&mut Value> {
        if self.is_null() {
            *self = match segment {
                Segment::Key(_) => Value::map(),
                Segment::Index(_) => Value::list(),
            };
        }
        match (self, segment) {
            (Value::Map(map), Segment::Key(key)) => Ok(map.entry(key.clone()).or_default()),
            (Value::Map(map), Segment::Index(i)) => Ok(map.entry(i.to_string()).or_default()),
            (Value::List(list), Segment::Index(i)) => {
                let len = list.len();
                if *i > len.saturating_add(MAX_LIST_PADDING) {
                    return Err(Error::IndexOutOfBounds {
                        path: full_path(at),
                        index: *i,
                        len,
                    });
                }
                if *i >= len {
                    list.resize(*i + 1, Value::Null);
                }
                Ok(&mut list[*i])
            }
            (other, _) => Err(Error::shape_conflict(
                full_path(at),
                "container",
                other.type_name(),
            )),
        }
    }
}

/// JSON-like rendering, used in logs and by the demo
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => fmt::Display::fmt(b, f),
            Value::Int(n) => fmt::Display::fmt(n, f),
            Value::Float(x) => fmt::Display::fmt(x, f),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                f.write_str("[")?;
                let mut sep = "";
                for item in items {
                    write!(f, "{}{}", sep, item)?;
                    sep = ", ";
                }
                f.write_str("]")
            }
            Value::Map(fields) => {
                f.write_str("{")?;
                let mut sep = "";
                for (key, item) in fields {
                    write!(f, "{}{:?}: {}", sep, key, item)?;
                    sep = ", ";
                }
                f.write_str("}")
            }
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vec: Vec<T>) -> Self {
        Value::List(vec.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldPath;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Value::Int(42).as_float(), Some(42.0));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
    }

    #[test]
    fn test_value_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Int(1).is_truthy());
        assert!(!Value::String("".into()).is_truthy());
        assert!(!Value::list().is_truthy());
        assert!(Value::from(vec![1i64]).is_truthy());
    }

    #[test]
    fn test_get_path() {
        let form: Value = [
            ("question1", Value::Int(5)),
            ("group1", [("question3", Value::from(vec![22.5f64]))].into_iter().collect()),
        ]
        .into_iter()
        .collect();

        assert_eq!(form.get_path(&path("question1")), Some(&Value::Int(5)));
        assert_eq!(
            form.get_path(&path("group1.question3[0]")),
            Some(&Value::Float(22.5))
        );
        assert_eq!(
            form.get_path(&path("group1.question3.0")),
            Some(&Value::Float(22.5))
        );
        assert_eq!(form.get_path(&path("group1.missing")), None);
        assert_eq!(form.get_path(&path("question1.deeper")), None);
    }

    #[test]
    fn test_set_path_creates_containers() {
        let mut form = Value::map();
        form.set_path(&path("a.b[1].c"), Value::from("x")).unwrap();

        let list = form.get_path(&path("a.b")).and_then(Value::as_list).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].is_null());
        assert_eq!(form.get_path(&path("a.b.1.c")), Some(&Value::from("x")));
    }

    #[test]
    fn test_set_path_through_primitive_fails() {
        let mut form: Value = [("a", Value::Int(1))].into_iter().collect();
        let err = form.set_path(&path("a.b"), Value::Int(2)).unwrap_err();
        assert!(matches!(err, Error::ShapeConflict { .. }));
    }

    #[test]
    fn test_set_path_bounds_list_padding() {
        let mut form = Value::map();
        let err = crate::path::set(&mut form, "a[18446744073709551615]", 1i64).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfBounds { index: usize::MAX, len: 0, .. }
        ));
        assert!(matches!(
            form.set_path(&path("b[1000000000000]"), Value::Int(1)),
            Err(Error::IndexOutOfBounds { .. })
        ));

        form.set_path(&path("c[3]"), Value::Int(1)).unwrap();
        assert_eq!(
            form.get_path(&path("c")),
            Some(&Value::from(vec![Value::Null, Value::Null, Value::Null, Value::Int(1)]))
        );
        let far = MAX_LIST_PADDING + 4;
        assert!(form.set_path(&path(&format!("c[{}]", far)), Value::Int(2)).is_ok());
        assert!(form
            .set_path(&path(&format!("c[{}]", 2 * far + MAX_LIST_PADDING)), Value::Int(3))
            .is_err());
    }

    #[test]
    fn test_remove_path() {
        let mut form: Value = [("items", Value::from(vec![1i64, 2, 3]))].into_iter().collect();
        assert_eq!(form.remove_path(&path("items[1]")), Some(Value::Int(2)));
        assert_eq!(form.get_path(&path("items")), Some(&Value::from(vec![1i64, 3])));
        assert_eq!(form.remove_path(&path("items[5]")), None);
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let value: Value =
            ron::from_str(r#"{"question1": 5, "group1": {"question3": [22.5, "x"]}}"#)
                .expect("parse");
        assert_eq!(value.get_path(&path("question1")), Some(&Value::Int(5)));
        assert_eq!(
            value.get_path(&path("group1.question3[1]")),
            Some(&Value::from("x"))
        );
    }

    #[test]
    fn test_display_is_json_like() {
        let value: Value = [
            ("name", Value::from("a \"b\"")),
            ("answers", Value::from(vec![1i64, 2])),
            ("skip", Value::Null),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            value.to_string(),
            r#"{"name": "a \"b\"", "answers": [1, 2], "skip": null}"#
        );
    }
}
