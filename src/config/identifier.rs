//! Key syntax rules.
//!
//! A key must be usable both as a mapping key and as an attribute name:
//! a letter or underscore followed by word characters.

use crate::error::{ConfError, ConfResult};
use regex_lite::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z_]\w*$").expect("identifier pattern is valid"));

/// Check whether `key` is a valid configuration identifier.
pub fn is_valid_identifier(key: &str) -> bool {
    IDENTIFIER.is_match(key)
}

/// Validate `key`, returning an `InvalidIdentifier` error naming it.
pub fn validate_identifier(key: &str) -> ConfResult<()> {
    if is_valid_identifier(key) {
        Ok(())
    } else {
        Err(ConfError::invalid_identifier(key))
    }
}
