//! Integration tests for loading configuration files.

use cinegen::config::{load_config, load_config_or_default};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_partial_file_with_defaults() {
    let file = write_config(
        r#"
[service]
base_url = "https://studio.example.com/"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.service.base_url, "https://studio.example.com/");
    assert_eq!(config.service.timeout_secs, 600);
    assert_eq!(config.wizard.default_scene_count, 5);
}

#[test]
fn loads_wizard_section() {
    let file = write_config(
        r#"
[service]
timeout_secs = 120

[wizard]
default_scene_count = 3
max_scene_count = 8
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.service.timeout_secs, 120);
    assert_eq!(config.wizard.default_scene_count, 3);
    assert_eq!(config.wizard.max_scene_count, 8);
}

#[test]
fn invalid_values_are_rejected() {
    let file = write_config(
        r#"
[wizard]
default_scene_count = 9
max_scene_count = 4
"#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("default_scene_count"));
}

#[test]
fn malformed_toml_names_the_file() {
    let file = write_config("[service\nbase_url = ");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(load_config_or_default(Some(&missing)).is_err());
}
