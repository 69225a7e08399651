//! Tagged values stored in a configuration tree.
//!
//! The variant is decided once, when a value is set, and never
//! re-inspected afterwards.

use super::node::ConfigNode;
use crate::error::{ConfError, ConfResult};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::ops::Index;

/// Reserved key marking a mapping as opaque.
pub const FORCE_DICT_MARKER: &str = "__force_dict__";

/// Members of an opaque mapping. Nested mappings are opaque too.
pub type OpaqueMap = IndexMap<String, ConfValue>;

/// Shared null returned by `Index` lookups of absent keys.
pub(crate) static NULL: ConfValue = ConfValue::Scalar(Value::Null);

/// A value held by a [`ConfigNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfValue {
    /// Null, bool, number, string or list. Lists are never wrapped.
    Scalar(Value),
    /// A mapping opted out of wrapping; not merge-aware, not attribute-accessible.
    Opaque(OpaqueMap),
    /// A nested configuration node.
    Node(ConfigNode),
}

impl ConfValue {
    /// Attribute-style access into a nested node.
    ///
    /// Anything that is not a node has no attributes.
    pub fn attr(&self, name: &str) -> ConfResult<&ConfValue> {
        match self {
            ConfValue::Node(node) => node.attr(name),
            _ => Err(ConfError::unknown_attribute(name)),
        }
    }

    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            ConfValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut ConfigNode> {
        match self {
            ConfValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueMap> {
        match self {
            ConfValue::Opaque(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            ConfValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Value::as_bool)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Value::as_i64)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfValue::Scalar(Value::Null))
    }

    /// Plain JSON snapshot of this value. Nodes are flattened without a prefix.
    pub fn to_json(&self) -> Value {
        match self {
            ConfValue::Scalar(value) => value.clone(),
            ConfValue::Opaque(map) => Value::Object(opaque_to_json(map)),
            ConfValue::Node(node) => node.flatten(None),
        }
    }
}

/// Store a raw mapping verbatim as opaque members.
pub(crate) fn opaque_from_json(map: Map<String, Value>) -> OpaqueMap {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Object(inner) => ConfValue::Opaque(opaque_from_json(inner)),
                other => ConfValue::Scalar(other),
            };
            (key, value)
        })
        .collect()
}

/// Plain JSON form of opaque members.
pub(crate) fn opaque_to_json(map: &OpaqueMap) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}

impl Index<&str> for ConfValue {
    type Output = ConfValue;

    /// Mapping-style lookup through nodes and opaque mappings.
    ///
    /// Yields a null scalar for absent keys or non-mapping values, so
    /// chained lookups never panic.
    fn index(&self, key: &str) -> &ConfValue {
        match self {
            ConfValue::Node(node) => &node[key],
            ConfValue::Opaque(map) => map.get(key).unwrap_or(&NULL),
            ConfValue::Scalar(_) => &NULL,
        }
    }
}

impl From<ConfigNode> for ConfValue {
    fn from(node: ConfigNode) -> Self {
        ConfValue::Node(node)
    }
}

/// A value arriving through `set` or `update`.
///
/// Raw values go through the full set-time transformation chain. Built
/// values came from another tree and keep their shape.
#[derive(Debug, Clone)]
pub enum Incoming {
    Raw(Value),
    Built(ConfValue),
}

impl From<Value> for Incoming {
    fn from(value: Value) -> Self {
        Incoming::Raw(value)
    }
}

impl From<&Value> for Incoming {
    fn from(value: &Value) -> Self {
        Incoming::Raw(value.clone())
    }
}

impl From<ConfValue> for Incoming {
    fn from(value: ConfValue) -> Self {
        Incoming::Built(value)
    }
}

impl From<&ConfValue> for Incoming {
    fn from(value: &ConfValue) -> Self {
        Incoming::Built(value.clone())
    }
}

impl From<ConfigNode> for Incoming {
    fn from(node: ConfigNode) -> Self {
        Incoming::Built(ConfValue::Node(node))
    }
}

/// Whether a marker value opts its mapping out of wrapping.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
