//! The in-memory tree produced by decoding and consumed by encoding.

use std::fmt;
use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

/// Ordered object container.
///
/// Keys are raw byte strings exactly as decoded; insertion order is
/// preserved so that a decode/encode round trip walks entries in input
/// order. Inserting an existing key replaces the value but keeps the key's
/// original position.
pub type Map = IndexMap<Vec<u8>, Value, BuildHasherDefault<FxHasher>>;

/// A decoded KeyValues value.
///
/// All three dialects decode into this union. `Null` is a real value (an
/// explicit placeholder), distinct from a key being absent.
///
/// # Example
///
/// ```
/// use textkv_util::{Map, Value};
///
/// let mut map = Map::default();
/// map.insert(b"name".to_vec(), Value::from("engine"));
/// let root = Value::Object(map);
///
/// assert_eq!(root.get("name"), Some(&Value::from("engine")));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Explicit null placeholder.
    Null,
    /// Boolean leaf.
    Bool(bool),
    /// IEEE-754 double leaf.
    Number(f64),
    /// Byte-string leaf. Escape decoding produces UTF-8 for `\u` escapes,
    /// but other bytes pass through untouched.
    String(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Ordered mapping from byte-string key to value.
    Object(Map),
}

impl Value {
    /// Returns the value stored under `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key.as_bytes()),
            _ => None,
        }
    }

    /// Returns the element at `index` if this is an array.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Returns the string payload as bytes, if this is a string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the string payload as UTF-8, if this is a string holding
    /// valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Returns the numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Type name used in encode error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    /// Debug-oriented rendering. The dialect emitters, not this impl,
    /// define the wire formats.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", String::from_utf8_lossy(k), v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_access() {
        let mut map = Map::default();
        map.insert(b"a".to_vec(), Value::from(1.0));
        map.insert(b"b".to_vec(), Value::from("two"));
        let root = Value::Object(map);

        assert_eq!(root.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(root.get("b").and_then(Value::as_str), Some("two"));
        assert_eq!(root.get("missing"), None);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = Map::default();
        for key in ["z", "a", "m"] {
            map.insert(key.as_bytes().to_vec(), Value::Null);
        }
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![b"z".to_vec(), b"a".to_vec(), b"m".to_vec()]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut map = Map::default();
        map.insert(b"x".to_vec(), Value::from(1.0));
        map.insert(b"y".to_vec(), Value::from(2.0));
        map.insert(b"x".to_vec(), Value::from(3.0));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![b"x".to_vec(), b"y".to_vec()]);
        assert_eq!(map[b"x".as_slice()], Value::Number(3.0));
    }

    #[test]
    fn test_array_access() {
        let arr = Value::Array(vec![Value::from(1.0), Value::Null]);
        assert_eq!(arr.at(0), Some(&Value::Number(1.0)));
        assert_eq!(arr.at(1), Some(&Value::Null));
        assert_eq!(arr.at(2), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Bool(true).type_name(), "boolean");
        assert_eq!(Value::Array(vec![]).type_name(), "array");
    }

    #[test]
    fn test_non_utf8_string_payload() {
        let v = Value::String(vec![0xFF, 0x00, 0x41]);
        assert_eq!(v.as_bytes(), Some(&[0xFF, 0x00, 0x41][..]));
        assert_eq!(v.as_str(), None);
    }
}
