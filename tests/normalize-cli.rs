use std::fs;
use std::path::Path;

use assert_cmd::{assert::Assert, Command};
use serde_yaml_ng::Value;

mod stubs;

fn normalize_assert(config_path: &Path, output_path: &Path) -> Assert {
    let mut cmd = Command::cargo_bin("yml2esp").unwrap();
    cmd.arg("normalize").arg(config_path).arg(output_path).assert()
}

fn normalize_to_value(raw_config: &str) -> (Value, String) {
    let tempdir = tempfile::tempdir().unwrap();
    let config_path = tempdir.path().join("config.yaml");
    let output_path = tempdir.path().join("normalized.yaml");
    fs::write(&config_path, raw_config).unwrap();

    normalize_assert(&config_path, &output_path).success();

    let raw = fs::read_to_string(&output_path).unwrap();
    (serde_yaml_ng::from_str(&raw).unwrap(), raw)
}

#[test]
fn normalizes_flash_size_and_defaults() {
    let (doc, _) = normalize_to_value(stubs::config::LIGHT_CONFIG);
    assert_eq!(doc["flash"]["size"].as_str(), Some("8MB"));
    assert_eq!(doc["network"]["connectivity"].as_str(), Some("wifi"));
    assert_eq!(doc["device_name"].as_str(), Some("Bench Lamp"));
    // Button defaults filled in alongside the explicit values.
    assert_eq!(doc["buttons"][0]["gpio"].as_i64(), Some(4));
    assert_eq!(doc["buttons"][0]["active_level"].as_i64(), Some(1));
    assert_eq!(doc["buttons"][0]["long_press_time_ms"].as_i64(), Some(5000));
    assert_eq!(doc["buttons"][0]["mode"].as_str(), Some("local"));
}

#[test]
fn tristate_clusters_survive_normalization() {
    let (doc, _) = normalize_to_value(stubs::config::LIGHT_CONFIG);
    let endpoint = &doc["endpoints"][0];
    // Explicitly supplied mapping.
    assert_eq!(endpoint["identify"]["present"].as_bool(), Some(true));
    assert!(endpoint["identify"]["enabled"].is_null());
    assert_eq!(endpoint["identify"]["identify_time"].as_i64(), Some(5));
    // Bool shorthand.
    assert_eq!(endpoint["groups"]["enabled"].as_bool(), Some(true));
    // Never mentioned: present=false, not a zero value.
    assert_eq!(endpoint["level_control"]["present"].as_bool(), Some(false));
    assert!(endpoint["level_control"]["enabled"].is_null());
    assert!(endpoint["scenes_management"]["scene_table_size"].is_null());
}

#[test]
fn legacy_button_folds_into_remote_mode_for_switch() {
    let (doc, _) = normalize_to_value(stubs::config::SWITCH_LEGACY_CONFIG);
    let buttons = doc["buttons"].as_sequence().unwrap();
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0]["gpio"].as_i64(), Some(9));
    assert_eq!(buttons[0]["mode"].as_str(), Some("remote"));
}

#[test]
fn normalize_is_idempotent_across_invocations() {
    let tempdir = tempfile::tempdir().unwrap();
    let config_path = tempdir.path().join("config.yaml");
    let first_path = tempdir.path().join("first.yaml");
    let second_path = tempdir.path().join("second.yaml");
    fs::write(&config_path, stubs::config::LIGHT_CONFIG).unwrap();

    normalize_assert(&config_path, &first_path).success();
    normalize_assert(&first_path, &second_path).success();

    assert_eq!(
        fs::read_to_string(&first_path).unwrap(),
        fs::read_to_string(&second_path).unwrap()
    );
}

#[test]
fn unsupported_flash_size_names_the_allowed_set() {
    let tempdir = tempfile::tempdir().unwrap();
    let config_path = tempdir.path().join("config.yaml");
    let output_path = tempdir.path().join("normalized.yaml");
    fs::write(
        &config_path,
        "app:\n  device_type: light\n  flash_size: 7MB\n",
    )
    .unwrap();

    let assert = normalize_assert(&config_path, &output_path).failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("7MB"), "{stderr}");
    for allowed in ["4MB", "8MB", "16MB"] {
        assert!(stderr.contains(allowed), "{stderr}");
    }
    assert!(!output_path.exists());
}
