//! Layered configuration library.
//!
//! This module exports the configuration tree, its builders and the
//! runtime configuration service.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;

pub use config::{ConfValue, ConfigNode, ConfigSource, RuntimeConfig};
pub use error::{ConfError, ConfResult, ErrorCode};
