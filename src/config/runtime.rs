//! The runtime configuration service.
//!
//! [`RuntimeConfig`] owns the active tree. It starts from the built-in
//! defaults and is mutated in place by [`RuntimeConfig::apply`], either
//! layering a new source over what is there or clearing it first.
//!
//! New code should build a `RuntimeConfig` during startup and pass it
//! down explicitly. For code that expects one ambient configuration,
//! [`global`] exposes a single shared instance that is created on first
//! use and never replaced.
//!
//! # Caller obligations
//!
//! Mutation is not synchronized beyond what a Rust `static` requires.
//! All [`set_config`] calls belong in single-threaded startup, before
//! anything starts reading the configuration concurrently. Reads after
//! that point are safe only because nothing mutates any more.

use super::builder::{from_file, from_mapping};
use super::defaults::default_tree;
use super::loader::{FileLoader, SourceLoader};
use super::node::ConfigNode;
use crate::error::{ConfError, ConfResult};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, info};

/// A source that can be merged into the runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// A configuration file, read through the configured loader.
    Path(PathBuf),
    /// An in-memory nested mapping.
    Mapping(Value),
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::Path(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        ConfigSource::Path(path.to_path_buf())
    }
}

impl From<&str> for ConfigSource {
    fn from(path: &str) -> Self {
        ConfigSource::Path(PathBuf::from(path))
    }
}

impl TryFrom<Value> for ConfigSource {
    type Error = ConfError;

    /// Strings are paths, objects are mappings; nothing else is a source.
    fn try_from(value: Value) -> ConfResult<Self> {
        match value {
            Value::String(path) => Ok(ConfigSource::Path(PathBuf::from(path))),
            Value::Object(_) => Ok(ConfigSource::Mapping(value)),
            other => Err(ConfError::type_mismatch(format!(
                "{} is neither a mapping nor a path",
                other
            ))),
        }
    }
}

/// The active configuration tree and the loader used to read files into it.
pub struct RuntimeConfig {
    tree: ConfigNode,
    loader: Box<dyn SourceLoader>,
}

impl RuntimeConfig {
    /// Create a runtime configuration holding the built-in defaults.
    pub fn new() -> ConfResult<Self> {
        Ok(Self {
            tree: from_mapping(&default_tree())?,
            loader: Box::new(FileLoader::new()),
        })
    }

    /// Replace the loader used for [`ConfigSource::Path`] sources.
    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Merge `source` into the active tree.
    ///
    /// With `overwrite`, the tree is emptied first and ends up holding
    /// only what `source` provides. Otherwise keys absent from `source`
    /// are kept. An error means the source was not fully applied.
    pub fn apply(&mut self, source: impl Into<ConfigSource>, overwrite: bool) -> ConfResult<()> {
        let source = source.into();

        if overwrite {
            debug!("Clearing runtime configuration before applying source");
            self.tree.empty();
        }

        let built = match &source {
            ConfigSource::Path(path) => from_file(path, &*self.loader)?,
            ConfigSource::Mapping(data) => from_mapping(data)?,
        };
        self.tree.update(built)?;

        match source {
            ConfigSource::Path(path) => {
                info!(path = %path.display(), overwrite, "Applied configuration file")
            }
            ConfigSource::Mapping(_) => debug!(overwrite, "Applied configuration mapping"),
        }
        Ok(())
    }

    /// Merge an untyped source: a string path or a mapping.
    ///
    /// The overwrite clear happens before the type check, so a rejected
    /// value with `overwrite` still leaves the tree empty.
    pub fn apply_value(&mut self, value: Value, overwrite: bool) -> ConfResult<()> {
        if overwrite {
            self.tree.empty();
        }
        let source = ConfigSource::try_from(value)?;
        self.apply(source, false)
    }

    /// The active tree.
    pub fn conf(&self) -> &ConfigNode {
        &self.tree
    }

    pub fn conf_mut(&mut self) -> &mut ConfigNode {
        &mut self.tree
    }

    /// Plain nested-mapping snapshot of the active tree.
    pub fn flatten(&self, prefix: Option<&str>) -> Value {
        self.tree.flatten(prefix)
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

static RUNTIME: LazyLock<RwLock<RuntimeConfig>> = LazyLock::new(|| {
    RwLock::new(RuntimeConfig::new().expect("built-in default configuration is valid"))
});

/// The process-wide runtime configuration.
pub fn global() -> &'static RwLock<RuntimeConfig> {
    &RUNTIME
}

/// Merge `source` into the process-wide runtime configuration.
pub fn set_config(source: impl Into<ConfigSource>, overwrite: bool) -> ConfResult<()> {
    RUNTIME
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .apply(source, overwrite)
}

/// Read access to the process-wide runtime configuration.
pub fn conf() -> RwLockReadGuard<'static, RuntimeConfig> {
    RUNTIME.read().unwrap_or_else(PoisonError::into_inner)
}
