//! Layered configuration trees.
//!
//! Sources are folded into one nested [`ConfigNode`]:
//! 1. **Defaults** - the built-in tree from [`defaults::default_tree`]
//! 2. **Sources** - mappings or files merged in order with [`RuntimeConfig::apply`]
//!
//! ## Merge Strategy
//! - Mappings merged into an existing section are merged key by key
//! - Everything else (scalars, lists, opaque mappings) is replaced outright
//! - A mapping containing `__force_dict__: true` is stored as an opaque
//!   mapping and never merged into or wrapped
//!
//! ## Value Substitution
//! - `%(confdir)s` in a string is replaced, when the value is set, with the
//!   directory of the file the tree was loaded from (or the working directory)

pub mod builder;
pub mod defaults;
pub mod identifier;
pub mod loader;
pub mod node;
pub mod runtime;
pub mod value;

pub use builder::{from_bindings, from_file, from_mapping};
pub use identifier::{is_valid_identifier, validate_identifier};
pub use loader::{Binding, BindingValue, FileLoader, SourceFormat, SourceLoader};
pub use node::{CONFDIR_PLACEHOLDER, ConfigNode};
pub use runtime::{ConfigSource, RuntimeConfig, set_config};
pub use value::{ConfValue, FORCE_DICT_MARKER, Incoming, OpaqueMap};
