//! The recursive configuration node.
//!
//! A [`ConfigNode`] is an ordered mapping from identifier keys to
//! [`ConfValue`]s. Plain mappings assigned into a node become nested
//! nodes unless they carry the opaque marker, and strings containing
//! the `%(confdir)s` placeholder are rewritten against the node's
//! origin path when they are assigned.

use super::identifier::validate_identifier;
use super::value::{
    ConfValue, FORCE_DICT_MARKER, Incoming, NULL, is_truthy, opaque_from_json, opaque_to_json,
};
use crate::error::{ConfError, ConfResult};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Index;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Placeholder replaced with the configuration directory at set time.
pub const CONFDIR_PLACEHOLDER: &str = "%(confdir)s";

/// A configuration subtree supporting mapping-style and attribute-style access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    /// Path of the source this tree was built from, inherited by children.
    origin: Option<PathBuf>,
    values: IndexMap<String, ConfValue>,
}

impl ConfigNode {
    /// Create an empty node with no origin path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty node tagged with the path of its source.
    pub fn with_origin(origin: impl Into<PathBuf>) -> Self {
        Self {
            origin: Some(origin.into()),
            values: IndexMap::new(),
        }
    }

    pub fn origin_path(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub(crate) fn set_origin(&mut self, origin: Option<PathBuf>) {
        self.origin = origin;
    }

    /// Mapping-style lookup.
    pub fn get(&self, key: &str) -> ConfResult<&ConfValue> {
        self.values
            .get(key)
            .ok_or_else(|| ConfError::missing_key(key))
    }

    /// Lookup that falls back to `default` instead of failing.
    pub fn get_or_default<'a>(&'a self, key: &str, default: &'a ConfValue) -> &'a ConfValue {
        self.values.get(key).unwrap_or(default)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfValue> {
        self.values.get_mut(key)
    }

    /// Attribute-style lookup.
    ///
    /// Same condition as [`ConfigNode::get`], reported as an unknown
    /// attribute of the configuration object.
    pub fn attr(&self, name: &str) -> ConfResult<&ConfValue> {
        self.values
            .get(name)
            .ok_or_else(|| ConfError::unknown_attribute(name))
    }

    /// Resolve a dotted path such as `app.debug` attribute by attribute.
    pub fn resolve(&self, path: &str) -> ConfResult<&ConfValue> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut current = self.attr(first)?;
        for segment in segments {
            current = current.attr(segment)?;
        }
        Ok(current)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every binding. The origin path is kept.
    pub fn empty(&mut self) {
        self.values.clear();
    }

    /// Validate `key` and store `value` through the set-time transformations.
    pub fn set(&mut self, key: &str, value: impl Into<Incoming>) -> ConfResult<()> {
        validate_identifier(key)?;
        self.store(key, value.into())
    }

    /// Merge `source` into this node, entry by entry, in source order.
    ///
    /// Entries whose current value is a nested node are merged into it
    /// recursively; everything else is set outright. A bad key aborts
    /// the merge at that entry, leaving earlier entries committed.
    pub fn update<I, K, V>(&mut self, source: I) -> ConfResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Incoming>,
    {
        for (key, value) in source {
            let key = key.as_ref();
            validate_identifier(key)?;

            match self.values.get_mut(key) {
                Some(ConfValue::Node(node)) => node.merge(key, value.into())?,
                _ => self.store(key, value.into())?,
            }
        }
        Ok(())
    }

    /// Merge a JSON object into this node.
    pub fn update_value(&mut self, source: &Value) -> ConfResult<()> {
        match source {
            Value::Object(map) => self.update(map),
            other => Err(ConfError::type_mismatch(format!(
                "cannot update configuration from {}",
                describe(other)
            ))),
        }
    }

    /// Plain nested-mapping snapshot of this node.
    ///
    /// With a prefix, every key of every nested node is rewritten to
    /// `prefix + key`, level by level. Keys inside opaque mappings are
    /// left alone.
    pub fn flatten(&self, prefix: Option<&str>) -> Value {
        let prefix = prefix.filter(|p| !p.is_empty());
        let mut out = Map::new();
        for (key, value) in &self.values {
            let key = match prefix {
                Some(prefix) => format!("{prefix}{key}"),
                None => key.clone(),
            };
            let value = match value {
                ConfValue::Node(node) => node.flatten(prefix),
                ConfValue::Opaque(map) => Value::Object(opaque_to_json(map)),
                ConfValue::Scalar(value) => value.clone(),
            };
            out.insert(key, value);
        }
        Value::Object(out)
    }

    /// Recursive branch of `update`: `incoming` must be dict-like.
    fn merge(&mut self, key: &str, incoming: Incoming) -> ConfResult<()> {
        match incoming {
            Incoming::Raw(Value::Object(map))
            | Incoming::Built(ConfValue::Scalar(Value::Object(map))) => self.update(map),
            Incoming::Built(ConfValue::Opaque(map)) => self.update(opaque_to_json(&map)),
            Incoming::Built(ConfValue::Node(node)) => self.update(node),
            Incoming::Raw(other) | Incoming::Built(ConfValue::Scalar(other)) => {
                Err(ConfError::type_mismatch(format!(
                    "cannot merge {} into configuration section '{}'",
                    describe(&other),
                    key
                ))
                .with_key(key))
            }
        }
    }

    fn store(&mut self, key: &str, incoming: Incoming) -> ConfResult<()> {
        let value = self.transform(incoming)?;
        trace!(key, "set configuration value");
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn transform(&self, incoming: Incoming) -> ConfResult<ConfValue> {
        let value = match incoming {
            Incoming::Built(ConfValue::Scalar(value)) | Incoming::Raw(value) => value,
            Incoming::Built(built) => return Ok(built),
        };

        match value {
            Value::Object(mut map) => {
                if map.get(FORCE_DICT_MARKER).is_some_and(is_truthy) {
                    map.shift_remove(FORCE_DICT_MARKER);
                    Ok(ConfValue::Opaque(opaque_from_json(map)))
                } else {
                    let mut child = ConfigNode {
                        origin: self.origin.clone(),
                        values: IndexMap::new(),
                    };
                    child.update(map)?;
                    Ok(ConfValue::Node(child))
                }
            }
            Value::String(s) if s.contains(CONFDIR_PLACEHOLDER) => {
                let confdir = self.confdir();
                Ok(ConfValue::Scalar(Value::String(
                    s.replace(CONFDIR_PLACEHOLDER, &confdir.to_string_lossy()),
                )))
            }
            other => Ok(ConfValue::Scalar(other)),
        }
    }

    /// Directory of the origin path, or the working directory.
    fn confdir(&self) -> PathBuf {
        self.origin
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

impl Index<&str> for ConfigNode {
    type Output = ConfValue;

    /// Mapping-style lookup yielding a null scalar for absent keys.
    fn index(&self, key: &str) -> &ConfValue {
        self.values.get(key).unwrap_or(&NULL)
    }
}

impl IntoIterator for ConfigNode {
    type Item = (String, ConfValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigNode {
    type Item = (&'a String, &'a ConfValue);
    type IntoIter = indexmap::map::Iter<'a, String, ConfValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Config({})", self.flatten(None))
    }
}
