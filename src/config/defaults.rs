//! Built-in default configuration.

use serde_json::{Value, json};

/// Default tree every runtime configuration starts from.
///
/// `app.errors` carries the opaque marker, so it stays a plain mapping
/// of error handlers rather than a nested section.
pub fn default_tree() -> Value {
    json!({
        // Server specific configuration
        "server": {
            "port": "8080",
            "host": "0.0.0.0"
        },

        // Application configuration
        "app": {
            "root": null,
            "modules": [],
            "static_root": "public",
            "template_path": "",
            "debug": false,
            "logging": false,
            "force_canonical": true,
            "errors": {
                "__force_dict__": true
            }
        }
    })
}
