use std::fs;
use std::path::Path;

use assert_cmd::{assert::Assert, Command};

mod stubs;

fn normalize_assert(config_path: &Path, output_path: &Path) -> Assert {
    let mut cmd = Command::cargo_bin("yml2esp").unwrap();
    cmd.arg("normalize").arg(config_path).arg(output_path).assert()
}

fn emit_assert(normalized: &Path, header: &Path, project: &Path) -> Assert {
    let mut cmd = Command::cargo_bin("yml2esp").unwrap();
    cmd.arg("emit")
        .arg("--project")
        .arg(project)
        .arg(normalized)
        .arg(header)
        .assert()
}

/// Run the normalize -> emit pipeline for a raw config, returning the tempdir
/// holding `project/` and the generated header.
fn run_pipeline(raw_config: &str) -> tempfile::TempDir {
    let tempdir = tempfile::tempdir().unwrap();
    let config_path = tempdir.path().join("config.yaml");
    let normalized_path = tempdir.path().join("normalized.yaml");
    let project = tempdir.path().join("project");
    fs::create_dir_all(&project).unwrap();
    fs::write(&config_path, raw_config).unwrap();

    normalize_assert(&config_path, &normalized_path).success();
    emit_assert(
        &normalized_path,
        &tempdir.path().join("project/main/generated_config.h"),
        &project,
    )
    .success();
    tempdir
}

#[test]
fn emits_header_with_tristate_sentinels() {
    let tempdir = run_pipeline(stubs::config::LIGHT_CONFIG);
    let header =
        fs::read_to_string(tempdir.path().join("project/main/generated_config.h")).unwrap();

    assert!(header.contains("#define BUTTON_COUNT 1\n"), "{header}");
    assert!(header.contains("#define LED_STRIP_LED_COUNT 24\n"), "{header}");
    assert!(header.contains("#define FLASH_SIZE_MB 8\n"), "{header}");
    assert!(header.contains("#define APP_NETWORK_CONNECTIVITY_THREAD 0\n"), "{header}");
    // Supplied vs never-supplied optionals stay distinguishable.
    assert!(header.contains(".identify_time = {true, 5},"), "{header}");
    assert!(header.contains(".identify_type = {false, 0},"), "{header}");
    assert!(header.contains(".color_mode = {true, \"kXY\"},"), "{header}");
    assert!(header.contains(".enhanced_color_mode = {false, nullptr},"), "{header}");
    assert!(header.contains("num_endpoints = sizeof(endpoints) / sizeof(endpoint_raw)"), "{header}");
}

#[test]
fn emitting_twice_yields_byte_identical_output() {
    let tempdir = run_pipeline(stubs::config::LIGHT_CONFIG);
    let header_path = tempdir.path().join("project/main/generated_config.h");
    let first = fs::read_to_string(&header_path).unwrap();

    emit_assert(
        &tempdir.path().join("normalized.yaml"),
        &header_path,
        &tempdir.path().join("project"),
    )
    .success();
    assert_eq!(first, fs::read_to_string(&header_path).unwrap());
}

#[test]
fn copies_connectivity_and_flash_overlays() {
    let tempdir = run_pipeline(stubs::config::LIGHT_CONFIG);
    let project = tempdir.path().join("project");

    let defaults = fs::read_to_string(project.join("sdkconfig.defaults")).unwrap();
    assert!(defaults.contains("CONFIG_ENABLE_WIFI_STATION=y"), "{defaults}");

    // The shipped 8MB table carries inline comments; the copy must not.
    let partitions = fs::read_to_string(project.join("partitions.csv")).unwrap();
    assert!(partitions.contains("ota_0"), "{partitions}");
    assert!(partitions.lines().next().unwrap().starts_with('#'));
    assert!(
        !partitions.lines().any(|l| l.contains('#') && !l.trim_start().starts_with('#')),
        "{partitions}"
    );
}

#[test]
fn thread_config_selects_thread_overlays() {
    let tempdir = run_pipeline(stubs::config::THREAD_CONFIG);
    let project = tempdir.path().join("project");

    let defaults = fs::read_to_string(project.join("sdkconfig.defaults")).unwrap();
    assert!(defaults.contains("CONFIG_OPENTHREAD_ENABLED=y"), "{defaults}");

    let header =
        fs::read_to_string(tempdir.path().join("project/main/generated_config.h")).unwrap();
    assert!(header.contains("#define APP_NETWORK_CONNECTIVITY_THREAD 1\n"), "{header}");
    assert!(header.contains("#define FLASH_SIZE_MB 4\n"), "{header}");
}

#[test]
fn patches_existing_sdkconfig_preserving_unrelated_lines() {
    let tempdir = tempfile::tempdir().unwrap();
    let config_path = tempdir.path().join("config.yaml");
    let normalized_path = tempdir.path().join("normalized.yaml");
    let project = tempdir.path().join("project");
    fs::create_dir_all(&project).unwrap();
    fs::write(&config_path, stubs::config::THREAD_CONFIG).unwrap();

    let sdkconfig = "\
CONFIG_IDF_TARGET=\"esp32c6\"
CONFIG_LOG_DEFAULT_LEVEL=3
# CONFIG_OPENTHREAD_ENABLED is not set
CONFIG_ENABLE_WIFI_STATION=y
CONFIG_FREERTOS_HZ=1000
";
    fs::write(project.join("sdkconfig"), sdkconfig).unwrap();

    normalize_assert(&config_path, &normalized_path).success();
    emit_assert(
        &normalized_path,
        &tempdir.path().join("project/main/generated_config.h"),
        &project,
    )
    .success();

    let patched = fs::read_to_string(project.join("sdkconfig")).unwrap();
    let lines: Vec<&str> = patched.lines().collect();
    // Untouched lines keep their content and relative order.
    assert_eq!(lines[0], "CONFIG_IDF_TARGET=\"esp32c6\"");
    assert_eq!(lines[1], "CONFIG_LOG_DEFAULT_LEVEL=3");
    assert_eq!(lines[4], "CONFIG_FREERTOS_HZ=1000");
    // Matched lines are rewritten in place.
    assert_eq!(lines[2], "CONFIG_OPENTHREAD_ENABLED=y");
    assert_eq!(lines[3], "# CONFIG_ENABLE_WIFI_STATION is not set");
    // Unmatched overrides land at the end.
    assert!(patched.contains("CONFIG_ESP_MATTER_ENABLE_OPENTHREAD=y"));
    assert!(patched.contains("# CONFIG_ENABLE_WIFI_AP is not set"));
}
