//! Fixed defaults applied during configuration normalization.
//!
//! The cluster and feature tables are keyed by [`DeviceKind`] so that adding a
//! device kind without extending them is a compile error. Endpoint device types
//! outside the known set resolve to empty defaults.

use crate::config::model::{ClusterKind, DeviceKind};

pub const LOG_LEVEL: &str = "INFO";

pub const DEVICE_TYPE: &str = "light";
pub const DEVICE_NAME: &str = "ESP32 Matter Device";
pub const ENDPOINT_DEVICE_TYPE: &str = "on_off_light";
pub const LED_STRIP_TYPE: &str = "ws2812";

pub const BUTTON_ACTIVE_LEVEL: i64 = 0;
pub const BUTTON_LONG_PRESS_TIME_MS: i64 = 5000;
pub const BUTTON_SHORT_PRESS_TIMEOUT_MS: i64 = 2000;
pub const BUTTON_IDENTIFY_TRIGGER_COUNT: i64 = 5;
pub const BUTTON_IDENTIFY_TIME_S: i64 = 10;

/// Clusters a device kind carries when the endpoint does not mention them.
pub fn default_clusters(kind: DeviceKind) -> &'static [ClusterKind] {
    use ClusterKind::*;
    match kind {
        DeviceKind::OnOffLight => &[Identify, Groups, ScenesManagement, OnOff],
        DeviceKind::DimmableLight => &[Identify, Groups, ScenesManagement, OnOff, LevelControl],
        DeviceKind::ExtendedColorLight => &[
            Identify,
            Groups,
            ScenesManagement,
            OnOff,
            LevelControl,
            ColorControl,
        ],
    }
}

/// Feature set a cluster gets when the endpoint lists none explicitly.
///
/// Table order is the emission order, so derived feature lists render
/// identically across runs.
pub fn default_features(kind: DeviceKind, cluster: ClusterKind) -> &'static [&'static str] {
    use ClusterKind::*;
    match (kind, cluster) {
        (DeviceKind::OnOffLight, OnOff) => &["lighting"],
        (DeviceKind::DimmableLight, OnOff) => &["lighting"],
        (DeviceKind::DimmableLight, LevelControl) => &["on_off", "lighting"],
        (DeviceKind::ExtendedColorLight, OnOff) => &["lighting"],
        (DeviceKind::ExtendedColorLight, LevelControl) => &["on_off", "lighting"],
        (DeviceKind::ExtendedColorLight, ColorControl) => &["color_temperature", "xy"],
        _ => &[],
    }
}
