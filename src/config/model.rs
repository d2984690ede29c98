//! Canonical, fully-defaulted device configuration model.
//!
//! Produced once by [`crate::config::normalize`] and consumed read-only by the
//! template resolver, the renderer and the header emitter. Optional fields keep
//! the distinction between "never specified" and "explicitly set"; they always
//! serialize (as `null` when absent) so the intermediate document round-trips
//! without losing tri-state information.

use serde::{Deserialize, Serialize};

use crate::constants::defaults;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    Wifi,
    Thread,
    WifiThread,
}

impl Connectivity {
    pub const ALL: [Connectivity; 3] =
        [Connectivity::Wifi, Connectivity::Thread, Connectivity::WifiThread];

    pub fn as_str(&self) -> &'static str {
        match self {
            Connectivity::Wifi => "wifi",
            Connectivity::Thread => "thread",
            Connectivity::WifiThread => "wifi_thread",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|c| c.as_str() == name).copied()
    }

    pub fn uses_thread(&self) -> bool {
        matches!(self, Connectivity::Thread | Connectivity::WifiThread)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum FlashSize {
    #[serde(rename = "4MB")]
    Mb4,
    #[serde(rename = "8MB")]
    Mb8,
    #[serde(rename = "16MB")]
    Mb16,
}

impl FlashSize {
    pub const ALL: [FlashSize; 3] = [FlashSize::Mb4, FlashSize::Mb8, FlashSize::Mb16];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlashSize::Mb4 => "4MB",
            FlashSize::Mb8 => "8MB",
            FlashSize::Mb16 => "16MB",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|f| f.as_str() == name).copied()
    }

    pub fn megabytes(&self) -> u32 {
        match self {
            FlashSize::Mb4 => 4,
            FlashSize::Mb8 => 8,
            FlashSize::Mb16 => 16,
        }
    }
}

/// Color modes understood by the ColorControl cluster, in their canonical
/// `k*` spelling as they appear in input documents and in emitted artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorMode {
    #[serde(rename = "kColorTemperature")]
    ColorTemperature,
    #[serde(rename = "kCurrentHueAndCurrentSaturation")]
    CurrentHueAndCurrentSaturation,
    #[serde(rename = "kHueSaturation")]
    HueSaturation,
    #[serde(rename = "kXY")]
    Xy,
    #[serde(rename = "kUndefined")]
    Undefined,
}

impl ColorMode {
    pub const ALL: [ColorMode; 5] = [
        ColorMode::ColorTemperature,
        ColorMode::CurrentHueAndCurrentSaturation,
        ColorMode::HueSaturation,
        ColorMode::Xy,
        ColorMode::Undefined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::ColorTemperature => "kColorTemperature",
            ColorMode::CurrentHueAndCurrentSaturation => "kCurrentHueAndCurrentSaturation",
            ColorMode::HueSaturation => "kHueSaturation",
            ColorMode::Xy => "kXY",
            ColorMode::Undefined => "kUndefined",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|m| m.as_str() == name).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonMode {
    Local,
    Remote,
}

impl ButtonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonMode::Local => "local",
            ButtonMode::Remote => "remote",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "local" => Some(ButtonMode::Local),
            "remote" => Some(ButtonMode::Remote),
            _ => None,
        }
    }
}

/// Endpoint device kinds with built-in cluster and feature defaults.
///
/// Endpoint `device_type` strings outside this set are carried through
/// verbatim and simply get empty defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    OnOffLight,
    DimmableLight,
    ExtendedColorLight,
}

impl DeviceKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "on_off_light" => Some(DeviceKind::OnOffLight),
            "dimmable_light" => Some(DeviceKind::DimmableLight),
            "extended_color_light" => Some(DeviceKind::ExtendedColorLight),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterKind {
    Identify,
    Groups,
    ScenesManagement,
    OnOff,
    LevelControl,
    ColorControl,
}

impl ClusterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterKind::Identify => "identify",
            ClusterKind::Groups => "groups",
            ClusterKind::ScenesManagement => "scenes_management",
            ClusterKind::OnOff => "on_off",
            ClusterKind::LevelControl => "level_control",
            ClusterKind::ColorControl => "color_control",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    pub device_type: String,
    pub device_name: String,
    pub network: Network,
    pub led_strip: Option<LedStrip>,
    pub buttons: Vec<Button>,
    pub endpoints: Vec<Endpoint>,
    pub flash: Flash,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Network {
    pub connectivity: Connectivity,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Flash {
    pub size: FlashSize,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LedStrip {
    pub led_count: u32,
    pub rmt_gpio: i32,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Button {
    pub id: Option<String>,
    pub gpio: i64,
    pub active_level: i64,
    pub long_press_time_ms: i64,
    pub short_press_timeout_ms: i64,
    pub identify_trigger_count: i64,
    pub identify_time_s: i64,
    pub mode: ButtonMode,
    pub action_cluster: String,
    pub action_command: String,
    pub action_identify_time_s: i64,
    pub binding_endpoint: u16,
    pub target_endpoint: u16,
    pub driver: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Endpoint {
    pub id: u16,
    pub device_type: String,
    pub identify: IdentifyCluster,
    pub groups: GroupsCluster,
    pub scenes_management: ScenesManagementCluster,
    pub on_off: OnOffCluster,
    pub level_control: LevelControlCluster,
    pub color_control: ColorControlCluster,
}

impl Endpoint {
    pub fn device_kind(&self) -> Option<DeviceKind> {
        DeviceKind::from_name(&self.device_type)
    }

    /// Resolve a cluster's tri-state `enabled` flag: an explicit value wins;
    /// otherwise the cluster is enabled iff it was mentioned under the
    /// endpoint or belongs to the device kind's default cluster set.
    pub fn cluster_enabled(&self, cluster: ClusterKind) -> bool {
        let (present, explicit) = match cluster {
            ClusterKind::Identify => (self.identify.present, self.identify.enabled),
            ClusterKind::Groups => (self.groups.present, self.groups.enabled),
            ClusterKind::ScenesManagement => {
                (self.scenes_management.present, self.scenes_management.enabled)
            }
            ClusterKind::OnOff => (self.on_off.present, self.on_off.enabled),
            ClusterKind::LevelControl => (self.level_control.present, self.level_control.enabled),
            ClusterKind::ColorControl => (self.color_control.present, self.color_control.enabled),
        };
        if let Some(explicit) = explicit {
            return explicit;
        }
        if present {
            return true;
        }
        self.device_kind()
            .map(|kind| defaults::default_clusters(kind).contains(&cluster))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct IdentifyCluster {
    pub present: bool,
    pub enabled: Option<bool>,
    pub identify_time: Option<i64>,
    pub identify_type: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GroupsCluster {
    pub present: bool,
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ScenesManagementCluster {
    pub present: bool,
    pub enabled: Option<bool>,
    pub scene_table_size: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct OnOffCluster {
    pub present: bool,
    pub enabled: Option<bool>,
    pub state: Option<bool>,
    pub features: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct LevelControlCluster {
    pub present: bool,
    pub enabled: Option<bool>,
    pub current_level: Option<i64>,
    pub options: Option<i64>,
    pub on_level: Option<i64>,
    pub features: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ColorControlCluster {
    pub present: bool,
    pub enabled: Option<bool>,
    pub color_mode: Option<ColorMode>,
    pub enhanced_color_mode: Option<ColorMode>,
    pub current_hue: Option<i64>,
    pub current_saturation: Option<i64>,
    pub color_temperature_mireds: Option<i64>,
    pub remaining_time: Option<i64>,
    pub features: Vec<String>,
}
