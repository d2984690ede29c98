//! Build-configuration overlays.
//!
//! Copies the connectivity-specific sdkconfig defaults and the flash-size
//! partition table into the project root, then patches individual
//! `CONFIG_*=...` lines in an existing `sdkconfig`. Everything the patch does
//! not target is preserved byte for byte and in its original position.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error;

use crate::config::model::{Connectivity, FlashSize};

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("missing template '{name}'; searched: {}", .searched.iter().map(|p| p.display().to_string()).join(", "))]
    MissingTemplate { name: String, searched: Vec<PathBuf> },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub enum KconfigValue {
    Bool(bool),
    Literal(String),
}

fn sdkconfig_template(connectivity: Connectivity) -> &'static str {
    match connectivity {
        Connectivity::Wifi => "sdkconfig.defaults_wifi",
        Connectivity::Thread => "sdkconfig.defaults_thread",
        Connectivity::WifiThread => "sdkconfig.defaults_wifi_thread",
    }
}

fn partition_template(flash_size: FlashSize) -> &'static str {
    match flash_size {
        FlashSize::Mb4 => "partitions.csv_4MB",
        FlashSize::Mb8 => "partitions.csv_8MB",
        FlashSize::Mb16 => "partitions.csv_16MB",
    }
}

/// Locate a template, preferring project-local overrides over the shipped
/// resources. The error names every location that was tried.
fn find_template(
    project_root: &Path,
    resources_dir: &Path,
    name: &str,
) -> Result<PathBuf, OverlayError> {
    let candidates = [
        project_root.join("templates"),
        resources_dir.join("templates"),
        resources_dir.to_path_buf(),
    ];
    for directory in &candidates {
        let candidate = directory.join(name);
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(OverlayError::MissingTemplate {
        name: name.to_string(),
        searched: candidates.iter().map(|d| d.join(name)).collect(),
    })
}

pub fn write_sdkconfig_defaults(
    project_root: &Path,
    resources_dir: &Path,
    connectivity: Connectivity,
) -> Result<(), OverlayError> {
    let template = find_template(project_root, resources_dir, sdkconfig_template(connectivity))?;
    fs::copy(&template, project_root.join("sdkconfig.defaults"))?;
    log::debug!("Copied {} to sdkconfig.defaults", template.display());
    Ok(())
}

pub fn copy_partition_table(
    project_root: &Path,
    resources_dir: &Path,
    flash_size: FlashSize,
) -> Result<(), OverlayError> {
    let template = find_template(project_root, resources_dir, partition_template(flash_size))?;
    let raw = fs::read_to_string(&template)?;
    fs::write(project_root.join("partitions.csv"), strip_inline_comments(&raw))?;
    log::debug!("Copied {} to partitions.csv", template.display());
    Ok(())
}

/// Drop text after a `#` unless the line itself is a comment line.
/// Line-oriented on purpose: the partition CSV is not re-parsed.
fn strip_inline_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if let Some(idx) = line.find('#') {
            if !line.trim_start().starts_with('#') {
                out.push_str(line[..idx].trim_end());
                out.push('\n');
                continue;
            }
        }
        out.push_str(line);
    }
    out
}

fn kconfig_line(key: &str, value: &KconfigValue) -> String {
    match value {
        KconfigValue::Bool(true) => format!("CONFIG_{key}=y\n"),
        KconfigValue::Bool(false) => format!("# CONFIG_{key} is not set\n"),
        KconfigValue::Literal(literal) => format!("CONFIG_{key}={literal}\n"),
    }
}

/// Feature toggles each connectivity mode needs in `sdkconfig`.
pub fn connectivity_overrides(connectivity: Connectivity) -> Vec<(&'static str, KconfigValue)> {
    use KconfigValue::Bool;
    match connectivity {
        Connectivity::Wifi => vec![
            ("OPENTHREAD_ENABLED", Bool(false)),
            ("ESP_MATTER_ENABLE_OPENTHREAD", Bool(false)),
            ("ENABLE_WIFI_STATION", Bool(true)),
            ("ENABLE_WIFI_AP", Bool(false)),
        ],
        Connectivity::Thread => vec![
            ("OPENTHREAD_ENABLED", Bool(true)),
            ("ESP_MATTER_ENABLE_OPENTHREAD", Bool(true)),
            ("ENABLE_WIFI_STATION", Bool(false)),
            ("ENABLE_WIFI_AP", Bool(false)),
        ],
        Connectivity::WifiThread => vec![
            ("OPENTHREAD_ENABLED", Bool(true)),
            ("ESP_MATTER_ENABLE_OPENTHREAD", Bool(true)),
            ("ENABLE_WIFI_STATION", Bool(true)),
            ("ENABLE_WIFI_AP", Bool(false)),
        ],
    }
}

/// Rewrite `key=value` override lines in an existing build-configuration
/// file. Each key replaces its assignment line or its disabled-comment line
/// in place; keys with no matching line are appended at the end. Does
/// nothing when the file does not exist.
pub fn apply_kconfig_overrides(
    config_path: &Path,
    overrides: &[(&str, KconfigValue)],
) -> Result<(), OverlayError> {
    if !config_path.exists() {
        return Ok(());
    }
    let raw = fs::read_to_string(config_path)?;

    let mut handled = vec![false; overrides.len()];
    let mut patched = String::with_capacity(raw.len());
    for line in raw.split_inclusive('\n') {
        let mut replaced = false;
        for (index, (key, value)) in overrides.iter().enumerate() {
            if line.starts_with(&format!("CONFIG_{key}="))
                || line.starts_with(&format!("# CONFIG_{key} is not set"))
            {
                patched.push_str(&kconfig_line(key, value));
                handled[index] = true;
                replaced = true;
                break;
            }
        }
        if !replaced {
            patched.push_str(line);
        }
    }

    if handled.iter().any(|done| !done) {
        if !patched.is_empty() && !patched.ends_with('\n') {
            patched.push('\n');
        }
        for (index, (key, value)) in overrides.iter().enumerate() {
            if !handled[index] {
                patched.push_str(&kconfig_line(key, value));
            }
        }
    }

    fs::write(config_path, patched)?;
    Ok(())
}

/// Apply every overlay for the selected connectivity and flash size.
pub fn apply_overlay(
    project_root: &Path,
    resources_dir: &Path,
    connectivity: Connectivity,
    flash_size: FlashSize,
) -> Result<(), OverlayError> {
    write_sdkconfig_defaults(project_root, resources_dir, connectivity)?;
    copy_partition_table(project_root, resources_dir, flash_size)?;
    apply_kconfig_overrides(
        &project_root.join("sdkconfig"),
        &connectivity_overrides(connectivity),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_comments_are_stripped_but_comment_lines_kept() {
        let input = "# Name, Type, SubType\nnvs, data, nvs, 0x9000, 0x6000,\nfactory, app, factory, 0x10000, 0x1F0000,  # main image\n  # indented comment\n";
        let expected = "# Name, Type, SubType\nnvs, data, nvs, 0x9000, 0x6000,\nfactory, app, factory, 0x10000, 0x1F0000,\n  # indented comment\n";
        assert_eq!(strip_inline_comments(input), expected);
    }

    #[test]
    fn kconfig_patch_preserves_untouched_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdkconfig");
        let original = "\
CONFIG_IDF_TARGET=\"esp32c3\"
CONFIG_BT_ENABLED=y
# CONFIG_OPENTHREAD_ENABLED is not set
CONFIG_ENABLE_WIFI_STATION=y
CONFIG_LOG_DEFAULT_LEVEL=3
# a plain comment
CONFIG_FREERTOS_HZ=1000
";
        fs::write(&path, original).unwrap();

        apply_kconfig_overrides(&path, &connectivity_overrides(Connectivity::Thread)).unwrap();
        let patched = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = patched.lines().collect();
        assert_eq!(
            lines,
            vec![
                "CONFIG_IDF_TARGET=\"esp32c3\"",
                "CONFIG_BT_ENABLED=y",
                "CONFIG_OPENTHREAD_ENABLED=y",
                "# CONFIG_ENABLE_WIFI_STATION is not set",
                "CONFIG_LOG_DEFAULT_LEVEL=3",
                "# a plain comment",
                "CONFIG_FREERTOS_HZ=1000",
                // Keys without an existing line are appended.
                "CONFIG_ESP_MATTER_ENABLE_OPENTHREAD=y",
                "# CONFIG_ENABLE_WIFI_AP is not set",
            ]
        );
    }

    #[test]
    fn kconfig_patch_skips_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        apply_kconfig_overrides(
            &dir.path().join("sdkconfig"),
            &connectivity_overrides(Connectivity::Wifi),
        )
        .unwrap();
        assert!(!dir.path().join("sdkconfig").exists());
    }

    #[test]
    fn literal_overrides_render_as_plain_assignments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdkconfig");
        fs::write(&path, "CONFIG_LOG_DEFAULT_LEVEL=3\n").unwrap();
        apply_kconfig_overrides(
            &path,
            &[("LOG_DEFAULT_LEVEL", KconfigValue::Literal("5".to_string()))],
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "CONFIG_LOG_DEFAULT_LEVEL=5\n");
    }

    #[test]
    fn missing_template_error_names_every_search_location() {
        let project = tempfile::tempdir().unwrap();
        let resources = tempfile::tempdir().unwrap();
        let err =
            write_sdkconfig_defaults(project.path(), resources.path(), Connectivity::Wifi)
                .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sdkconfig.defaults_wifi"), "{message}");
        assert!(
            message.matches("sdkconfig.defaults_wifi").count() >= 3,
            "{message}"
        );
    }

    #[test]
    fn partition_copy_sanitizes_inline_comments() {
        let project = tempfile::tempdir().unwrap();
        let resources = tempfile::tempdir().unwrap();
        let templates = resources.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join("partitions.csv_8MB"),
            "# Name, Type\nfactory, app, factory, 0x10000, 0x3F0000,  # big slot\n",
        )
        .unwrap();

        copy_partition_table(project.path(), resources.path(), FlashSize::Mb8).unwrap();
        assert_eq!(
            fs::read_to_string(project.path().join("partitions.csv")).unwrap(),
            "# Name, Type\nfactory, app, factory, 0x10000, 0x3F0000,\n"
        );
    }

    #[test]
    fn project_templates_override_shipped_resources() {
        let project = tempfile::tempdir().unwrap();
        let resources = tempfile::tempdir().unwrap();
        for (dir, body) in [
            (project.path().join("templates"), "CONFIG_FROM_PROJECT=y\n"),
            (resources.path().join("templates"), "CONFIG_FROM_RESOURCES=y\n"),
        ] {
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("sdkconfig.defaults_wifi"), body).unwrap();
        }

        write_sdkconfig_defaults(project.path(), resources.path(), Connectivity::Wifi).unwrap();
        assert_eq!(
            fs::read_to_string(project.path().join("sdkconfig.defaults")).unwrap(),
            "CONFIG_FROM_PROJECT=y\n"
        );
    }
}
