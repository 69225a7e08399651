//! Source loading: turning a configuration file into name/value bindings.
//!
//! The tree never reads files itself. A [`SourceLoader`] is injected
//! wherever a path has to become bindings; [`FileLoader`] is the
//! declarative default and reads YAML or JSON documents whose top level
//! is a mapping. Any `Fn(&Path) -> ConfResult<Vec<Binding>>` also works
//! as a loader.

use crate::error::{ConfError, ConfResult};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// A value produced by a source loader.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingValue {
    /// Plain configuration data.
    Data(Value),
    /// A loaded module or namespace; never configuration data.
    Module(String),
}

/// A top-level `name = value` assignment found in a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: BindingValue,
}

impl Binding {
    pub fn data(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: BindingValue::Data(value),
        }
    }

    pub fn module(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: BindingValue::Module(module.into()),
        }
    }

    /// Names starting with `__` are internal to the source.
    pub fn is_private(&self) -> bool {
        self.name.starts_with("__")
    }

    pub fn is_module(&self) -> bool {
        matches!(self.value, BindingValue::Module(_))
    }
}

/// Capability turning an absolute file path into bindings.
pub trait SourceLoader: Send + Sync {
    fn load(&self, path: &Path) -> ConfResult<Vec<Binding>>;
}

impl<F> SourceLoader for F
where
    F: Fn(&Path) -> ConfResult<Vec<Binding>> + Send + Sync,
{
    fn load(&self, path: &Path) -> ConfResult<Vec<Binding>> {
        self(path)
    }
}

/// Document format understood by [`FileLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// Pick a format from the file extension. Anything that is not
    /// `.json` is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => SourceFormat::Json,
            _ => SourceFormat::Yaml,
        }
    }
}

/// Declarative loader for YAML and JSON configuration files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader {
    /// Force a format instead of detecting it from the extension.
    pub format: Option<SourceFormat>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: SourceFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    /// Parse `content` as a document and return its top-level entries.
    pub fn parse(content: &str, format: SourceFormat, path: &Path) -> ConfResult<Vec<Binding>> {
        let document: Value = match format {
            SourceFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| ConfError::parse(path, e))?
            }
            SourceFormat::Json => {
                serde_json::from_str(content).map_err(|e| ConfError::parse(path, e))?
            }
        };

        match document {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| Binding::data(name, value))
                .collect()),
            // An empty YAML document has no bindings.
            Value::Null => Ok(Vec::new()),
            _ => Err(ConfError::type_mismatch(format!(
                "top level of '{}' must be a mapping",
                path.display()
            ))),
        }
    }
}

impl SourceLoader for FileLoader {
    fn load(&self, path: &Path) -> ConfResult<Vec<Binding>> {
        let format = self.format.unwrap_or_else(|| SourceFormat::from_path(path));
        debug!(path = %path.display(), ?format, "Loading configuration source");

        let content = std::fs::read_to_string(path).map_err(|e| ConfError::io(path, e))?;
        Self::parse(&content, format, path)
    }
}
