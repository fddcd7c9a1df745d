use std::collections::BTreeMap;
use std::fmt;

use crate::array::Array;

// Value — tagged annotation variant
//
// A sample's annotation is one of a small set of shapes: a bare numeric
// label, a numeric array, an ordered tuple of further values, or named
// fields (e.g. {"boxes": [k,4], "labels": [k]} for detection targets).
// Collation dispatches on the variant tag of the first batch element, so
// what a dynamically typed framework discovers with runtime type checks is
// a plain enum match here.

/// An annotation (target) paired with a sample's input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single numeric label, e.g. a class index.
    Scalar(f64),
    /// A numeric array, e.g. a one-hot label or a box table.
    Array(Array),
    /// An ordered tuple of values, collated position by position.
    Seq(Vec<Value>),
    /// Named fields. `BTreeMap` keeps key iteration deterministic.
    Map(BTreeMap<String, Value>),
}

/// The variant tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Scalar,
    Array,
    Seq,
    Map,
}

impl Kind {
    /// Human-readable tag name.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Scalar => "scalar",
            Kind::Array => "array",
            Kind::Seq => "seq",
            Kind::Map => "map",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// The variant tag, used for collation dispatch and diagnostics.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Scalar(_) => Kind::Scalar,
            Value::Array(_) => Kind::Array,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
        }
    }

    /// Build a map value from `(key, value)` entries.
    ///
    /// ```
    /// use corral_core::{Array, Value};
    /// let target = Value::map([
    ///     ("boxes", Value::Array(Array::zeros((2, 4)))),
    ///     ("labels", Value::Array(Array::vector(vec![1.0, 3.0]))),
    /// ]);
    /// assert!(target.as_map().is_some());
    /// ```
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Value
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Vec<Value>> for Value {
    fn from(s: Vec<Value>) -> Self {
        Value::Seq(s)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(Value::Scalar(1.0).kind(), Kind::Scalar);
        assert_eq!(Value::Array(Array::scalar(0.0)).kind(), Kind::Array);
        assert_eq!(Value::Seq(vec![]).kind(), Kind::Seq);
        let empty: [(&str, Value); 0] = [];
        assert_eq!(Value::map(empty).kind(), Kind::Map);
        assert_eq!(Kind::Map.to_string(), "map");
    }

    #[test]
    fn test_accessors() {
        let v = Value::Scalar(3.0);
        assert_eq!(v.as_scalar(), Some(3.0));
        assert!(v.as_map().is_none());

        let m = Value::map([("labels", Array::vector(vec![1.0, 2.0]))]);
        let fields = m.as_map().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["labels"].as_array().unwrap().dims(), &[2]);
    }

    #[test]
    fn test_map_keys_are_ordered() {
        let m = Value::map([
            ("labels", Value::Scalar(0.0)),
            ("boxes", Value::Scalar(0.0)),
        ]);
        let keys: Vec<&str> = m.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["boxes", "labels"]);
    }
}
