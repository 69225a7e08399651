//! Integration tests for configuration tree behavior.
//!
//! Covers the public surface end to end:
//! - identifier validation and per-key merge failure
//! - recursive merge, opaque mappings, `%(confdir)s` substitution
//! - flattening with prefixes
//! - runtime overwrite vs layering

use layerconf::config::{
    Binding, ConfigSource, FileLoader, RuntimeConfig, from_bindings, from_file, from_mapping,
};
use layerconf::{ConfValue, ConfigNode, ErrorCode};
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to write a config file into a temp directory.
fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path
}

#[test]
fn test_valid_identifiers_are_accepted() {
    let mut node = ConfigNode::new();
    for key in ["a", "_", "_private", "CamelCase", "snake_case_9"] {
        node.set(key, json!(1)).unwrap();
    }
    assert_eq!(node.len(), 5);
}

#[test]
fn test_invalid_identifier_stops_batch_at_bad_key() {
    let mut node = ConfigNode::new();
    let err = node
        .update(vec![
            ("one", json!(1)),
            ("two", json!(2)),
            ("3three", json!(3)),
            ("four", json!(4)),
        ])
        .unwrap_err();

    assert!(err.is(ErrorCode::InvalidIdentifier));
    assert_eq!(node.keys().collect::<Vec<_>>(), vec!["one", "two"]);

    let err = node.set("with-dash", json!(5)).unwrap_err();
    assert!(err.is(ErrorCode::InvalidIdentifier));
    assert!(!node.contains_key("with-dash"));
}

#[test]
fn test_recursive_merge_keeps_untouched_siblings() {
    let mut node = from_mapping(&json!({"app": {"host": "x"}})).unwrap();
    node.update_value(&json!({"app": {"debug": true}})).unwrap();

    let app = node.attr("app").unwrap();
    assert_eq!(app.attr("debug").unwrap().as_bool(), Some(true));
    assert_eq!(app.attr("host").unwrap().as_str(), Some("x"));
}

#[test]
fn test_marked_mapping_is_opaque() {
    let node = from_mapping(&json!({
        "errors": {"__force_dict__": true, "not_found": "/404", "nested": {"k": "v"}}
    }))
    .unwrap();

    let errors = node.get("errors").unwrap();
    let map = errors.as_opaque().expect("opaque mapping");
    assert!(!map.contains_key("__force_dict__"));
    assert_eq!(map["nested"].to_json(), json!({"k": "v"}));

    let err = errors.attr("not_found").unwrap_err();
    assert!(err.is(ErrorCode::UnknownAttribute));
}

#[test]
fn test_opaque_members_reachable_by_index() {
    let mut runtime = RuntimeConfig::new().unwrap();
    runtime
        .apply(
            ConfigSource::Mapping(json!({"app": {"errors": {"__force_dict__": true, "e404": "/nf"}}})),
            false,
        )
        .unwrap();

    let conf = runtime.conf();
    assert_eq!(conf["app"]["errors"]["e404"].as_str(), Some("/nf"));
    assert!(conf.resolve("app.errors.e404").is_err());
}

#[test]
fn test_confdir_substitution_from_origin() {
    let bindings = vec![Binding::data("data", json!("%(confdir)s/data"))];
    let node = from_bindings(bindings, Some(PathBuf::from("/etc/app/conf.cfg"))).unwrap();
    assert_eq!(node["data"].as_str(), Some("/etc/app/data"));
}

#[test]
fn test_flatten_prefix_reapplied_per_level() {
    let node = from_mapping(&json!({"a": {"b": 1}})).unwrap();
    let flat = node.flatten(Some("x_"));
    assert_eq!(flat, json!({"x_a": {"x_b": 1}}));
    assert!(flat["x_a"].get("b").is_none());
}

#[test]
fn test_overwrite_vs_layering() {
    let mut layered = RuntimeConfig::new().unwrap();
    layered
        .apply(ConfigSource::Mapping(json!({"extra": {"on": true}})), false)
        .unwrap();
    assert!(layered.conf().contains_key("server"));
    assert!(layered.conf().contains_key("app"));
    assert!(layered.conf().contains_key("extra"));

    let mut replaced = RuntimeConfig::new().unwrap();
    replaced
        .apply(ConfigSource::Mapping(json!({"extra": {"on": true}})), true)
        .unwrap();
    assert_eq!(replaced.conf().keys().collect::<Vec<_>>(), vec!["extra"]);
}

#[test]
fn test_apply_integer_is_type_mismatch() {
    let mut runtime = RuntimeConfig::new().unwrap();
    let err = runtime.apply_value(json!(7), false).unwrap_err();
    assert!(err.is(ErrorCode::TypeMismatch));
}

#[test]
fn test_file_layers_over_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "site.yaml",
        r#"
server:
  port: "8443"
app:
  debug: true
  template_path: "%(confdir)s/templates"
  errors:
    __force_dict__: true
    "404": /errors/not-found
"#,
    );

    let mut runtime = RuntimeConfig::new().unwrap();
    runtime.apply(path.as_path(), false).unwrap();

    let conf = runtime.conf();
    assert_eq!(conf["server"]["port"].as_str(), Some("8443"));
    assert_eq!(conf["server"]["host"].as_str(), Some("0.0.0.0"));
    assert_eq!(conf["app"]["debug"].as_bool(), Some(true));
    assert_eq!(conf["app"]["static_root"].as_str(), Some("public"));

    let templates = temp.path().join("templates").to_string_lossy().into_owned();
    assert_eq!(conf["app"]["template_path"].as_str(), Some(templates.as_str()));

    let errors = conf.resolve("app.errors").unwrap().as_opaque().unwrap();
    assert_eq!(errors["404"].as_str(), Some("/errors/not-found"));
    assert_eq!(conf["app"]["errors"]["404"].as_str(), Some("/errors/not-found"));
}

#[test]
fn test_json_file_with_private_entries() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "conf.json",
        r#"{"__file__": "ignored", "app": {"modules": ["site", "admin"]}}"#,
    );

    let node = from_file(&path, &FileLoader::new()).unwrap();
    assert!(!node.contains_key("__file__"));
    assert_eq!(
        node["app"]["modules"],
        ConfValue::Scalar(json!(["site", "admin"]))
    );
    assert_eq!(node.origin_path(), Some(path.as_path()));
}

#[test]
fn test_invalid_file_reports_error() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "broken.json", "{ nope");

    let mut runtime = RuntimeConfig::new().unwrap();
    let err = runtime.apply(path.as_path(), false).unwrap_err();
    assert!(err.is(ErrorCode::Parse));
    assert!(runtime.conf().contains_key("server"));
}

#[test]
fn test_merging_two_files_keeps_each_origin() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let a = write_config(&first, "a.yaml", "paths:\n  one: '%(confdir)s'\n");
    let b = write_config(&second, "b.yaml", "paths:\n  two: '%(confdir)s'\n");

    let mut runtime = RuntimeConfig::new().unwrap();
    runtime.apply(a.as_path(), false).unwrap();
    runtime.apply(b.as_path(), false).unwrap();

    let paths = runtime.conf().get("paths").unwrap().as_node().unwrap();
    let one = first.path().to_string_lossy().into_owned();
    let two = second.path().to_string_lossy().into_owned();
    assert_eq!(paths["one"].as_str(), Some(one.as_str()));
    assert_eq!(paths["two"].as_str(), Some(two.as_str()));
    assert_eq!(paths.origin_path(), Some(a.as_path()));
    assert!(paths.origin_path().is_some_and(Path::is_absolute));
}
