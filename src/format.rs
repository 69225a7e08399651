//! Output formatting for configuration snapshots.

use anyhow::Result;
use serde_json::Value;

/// Output format for printed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Render a plain value. JSON is pretty-printed; both end with a newline.
    pub fn render(&self, value: &Value) -> Result<String> {
        let mut out = match self {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        };
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;
    use serde_json::json;

    #[test]
    fn test_parse_from_flag_value() {
        assert_eq!(OutputFormat::from_str("json", false), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("YAML", true), Ok(OutputFormat::Yaml));
        assert!(OutputFormat::from_str("toml", true).is_err());
    }

    #[test]
    fn test_render_json() {
        let out = OutputFormat::Json.render(&json!({"a": 1})).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_render_yaml_keeps_order() {
        let out = OutputFormat::Yaml
            .render(&json!({"server": {"port": "8080"}, "app": {"debug": false}}))
            .unwrap();
        let server = out.find("server:").unwrap();
        let app = out.find("app:").unwrap();
        assert!(server < app);
        assert!(out.contains("  debug: false\n"));
    }

    #[test]
    fn test_render_scalar() {
        assert_eq!(OutputFormat::Json.render(&json!(true)).unwrap(), "true\n");
    }
}
