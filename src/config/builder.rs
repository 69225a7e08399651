//! Building configuration trees from mappings, bindings and files.

use super::loader::{Binding, BindingValue, SourceLoader};
use super::node::ConfigNode;
use crate::error::{ConfError, ConfResult};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Build a tree from a plain nested mapping.
///
/// Every key is kept, dunder names included, and the tree has no
/// origin: a `__file__` entry is stored like any other key.
pub fn from_mapping(data: &Value) -> ConfResult<ConfigNode> {
    let mut node = ConfigNode::new();
    match data {
        Value::Object(map) => node.update(map)?,
        _ => {
            return Err(ConfError::type_mismatch(
                "configuration must be built from a mapping",
            ));
        }
    }
    Ok(node)
}

/// Build a tree from loader bindings, tagging it with `origin`.
///
/// Private names (leading `__`) and module bindings are skipped.
pub fn from_bindings(
    bindings: impl IntoIterator<Item = Binding>,
    origin: Option<PathBuf>,
) -> ConfResult<ConfigNode> {
    let mut node = ConfigNode::new();
    node.set_origin(origin);

    for binding in bindings {
        if binding.is_private() {
            continue;
        }
        match binding.value {
            BindingValue::Module(module) => {
                warn!(name = %binding.name, %module, "Skipping module binding in configuration source");
            }
            BindingValue::Data(value) => node.set(&binding.name, value)?,
        }
    }
    Ok(node)
}

/// Build a tree from a file, using `loader` to read it.
pub fn from_file(path: impl AsRef<Path>, loader: &dyn SourceLoader) -> ConfResult<ConfigNode> {
    let abspath = absolute_path(path.as_ref())?;
    debug!(path = %abspath.display(), "Building configuration from file");

    let bindings = loader.load(&abspath)?;
    from_bindings(bindings, Some(abspath))
}

/// Expand a leading `~` and make `path` absolute against the working directory.
pub fn absolute_path(path: &Path) -> ConfResult<PathBuf> {
    let expanded = expand_home(path);
    std::path::absolute(&expanded).map_err(|e| ConfError::io(path, e))
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
