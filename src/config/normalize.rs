//! Converts a validated raw document into the canonical [`AppConfig`] form.
//!
//! All defaulting lives here: per-device-kind cluster and feature sets,
//! tri-state cluster flags, button and LED defaults, legacy key folding and
//! flash/connectivity normalization. Documents that are already in normalized
//! form (no `app` root) deserialize straight into the typed model, which is
//! what lets normalization and rendering run as separate invocations over the
//! intermediate file.

use std::collections::HashSet;

use itertools::Itertools;
use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;

use crate::config::model::{
    AppConfig, Button, ButtonMode, ClusterKind, ColorControlCluster, ColorMode, Connectivity,
    DeviceKind, Endpoint, Flash, FlashSize, GroupsCluster, IdentifyCluster, LedStrip,
    LevelControlCluster, Network, OnOffCluster, ScenesManagementCluster,
};
use crate::config::value::{parse_bool, parse_int, parse_string, parse_string_list};
use crate::constants::defaults;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("unsupported flash_size '{value}'; supported values: {allowed}")]
    UnsupportedFlashSize { value: String, allowed: String },
    #[error("flash_size must be specified in megabytes, e.g. '4MB' or '8MB' (got '{value}')")]
    FlashSizeUnit { value: String },
    #[error("unsupported connectivity '{value}'; expected one of: {allowed}")]
    UnsupportedConnectivity { value: String, allowed: String },
    #[error("unsupported color_mode '{value}'; valid options: {allowed}")]
    UnsupportedColorMode { value: String, allowed: String },
    #[error("unsupported button mode '{value}'; expected one of: local, remote")]
    UnsupportedButtonMode { value: String },
    #[error("button definition is missing a valid 'gpio' value")]
    ButtonMissingGpio,
    #[error("each button entry must be a mapping")]
    ButtonNotAMapping,
    #[error("endpoint entry is missing a valid 'id' value")]
    EndpointMissingId,
    #[error("duplicate endpoint id {0}")]
    DuplicateEndpointId(u16),
    #[error("could not parse normalized configuration: {0}")]
    Normalized(#[from] serde_yaml_ng::Error),
}

/// Normalize a document into the canonical configuration.
///
/// Raw documents carry their settings under an `app` root; documents without
/// one are treated as already-normalized intermediate output and deserialized
/// directly, making normalization idempotent.
pub fn normalize_document(doc: &Value) -> Result<AppConfig, NormalizeError> {
    if let Some(app) = doc.get("app") {
        return normalize_app(app);
    }
    if doc.get("flash").is_some() && doc.get("network").is_some() {
        return Ok(serde_yaml_ng::from_value(doc.clone())?);
    }
    normalize_app(&Value::Null)
}

fn normalize_app(app: &Value) -> Result<AppConfig, NormalizeError> {
    let device_type = app
        .get("device_type")
        .and_then(parse_string)
        .unwrap_or_else(|| defaults::DEVICE_TYPE.to_string());
    let device_name = app
        .get("device_name")
        .and_then(parse_string)
        .unwrap_or_else(|| defaults::DEVICE_NAME.to_string());

    let connectivity = normalize_connectivity(app.get("network"))?;
    let flash_size = normalize_flash_size(
        app.get("flash_size")
            .filter(|v| !v.is_null())
            .or_else(|| app.get("flash").filter(|v| !v.is_null())),
    )?;

    let endpoints = normalize_endpoints(app.get("endpoints"))?;
    let buttons = normalize_buttons(app, &device_type)?;
    let led_strip = normalize_led_strip(app.get("led_strip"));

    Ok(AppConfig {
        device_type,
        device_name,
        network: Network { connectivity },
        led_strip,
        buttons,
        endpoints,
        flash: Flash { size: flash_size },
    })
}

fn normalize_connectivity(network: Option<&Value>) -> Result<Connectivity, NormalizeError> {
    let raw = network
        .and_then(|n| n.get("connectivity"))
        .and_then(parse_string)
        .unwrap_or_else(|| "wifi".to_string());
    let lowered = raw.trim().to_lowercase();
    Connectivity::from_name(&lowered).ok_or_else(|| NormalizeError::UnsupportedConnectivity {
        value: lowered,
        allowed: Connectivity::ALL.iter().map(|c| c.as_str()).sorted().join(", "),
    })
}

fn normalize_flash_size(raw: Option<&Value>) -> Result<FlashSize, NormalizeError> {
    let mut size = raw
        .and_then(parse_string)
        .unwrap_or_else(|| "4MB".to_string())
        .trim()
        .to_uppercase();
    if !size.is_empty() && size.chars().all(|c| c.is_ascii_digit()) {
        size.push_str("MB");
    }
    if !size.ends_with("MB") {
        return Err(NormalizeError::FlashSizeUnit { value: size });
    }
    FlashSize::from_name(&size).ok_or_else(|| NormalizeError::UnsupportedFlashSize {
        value: size,
        allowed: FlashSize::ALL.iter().map(|f| f.as_str()).sorted().join(", "),
    })
}

fn normalize_led_strip(led_strip: Option<&Value>) -> Option<LedStrip> {
    let led_strip = led_strip?;
    let mapping = led_strip.as_mapping()?;
    if mapping.is_empty() {
        return None;
    }
    Some(LedStrip {
        led_count: led_strip
            .get("led_count")
            .and_then(parse_int)
            .unwrap_or(0)
            .max(0) as u32,
        rmt_gpio: led_strip.get("rmt_gpio").and_then(parse_int).unwrap_or(-1) as i32,
        kind: led_strip
            .get("type")
            .and_then(parse_string)
            .unwrap_or_else(|| defaults::LED_STRIP_TYPE.to_string()),
    })
}

fn normalize_buttons(app: &Value, device_type: &str) -> Result<Vec<Button>, NormalizeError> {
    let default_mode = if device_type == "switch" {
        ButtonMode::Remote
    } else {
        ButtonMode::Local
    };

    let buttons = app
        .get("buttons")
        .and_then(Value::as_sequence)
        .cloned()
        .unwrap_or_default();
    let legacy = app
        .get("button")
        .and_then(Value::as_mapping)
        .filter(|m| !m.is_empty());

    let entries: Vec<Value> = if buttons.is_empty() {
        match legacy {
            Some(legacy) => {
                let mut folded = legacy.clone();
                if !folded.contains_key("mode") {
                    folded.insert(
                        Value::from("mode"),
                        Value::from(default_mode.as_str()),
                    );
                }
                vec![Value::Mapping(folded)]
            }
            None => Vec::new(),
        }
    } else {
        if legacy.is_some() {
            log::warn!("both 'buttons' and legacy 'button' provided; using 'buttons'");
        }
        buttons
    };

    entries
        .iter()
        .map(|entry| parse_button_entry(entry, default_mode))
        .collect()
}

fn parse_button_entry(button: &Value, default_mode: ButtonMode) -> Result<Button, NormalizeError> {
    if button.as_mapping().is_none() {
        return Err(NormalizeError::ButtonNotAMapping);
    }

    let gpio = button
        .get("gpio")
        .and_then(parse_int)
        .ok_or(NormalizeError::ButtonMissingGpio)?;

    let identify_time_s = button
        .get("identify_time_s")
        .and_then(parse_int)
        .unwrap_or(defaults::BUTTON_IDENTIFY_TIME_S);

    let mode = match button.get("mode").and_then(parse_string) {
        Some(raw) => {
            let lowered = raw.trim().to_lowercase();
            ButtonMode::from_name(&lowered)
                .ok_or(NormalizeError::UnsupportedButtonMode { value: lowered })?
        }
        None => default_mode,
    };

    let action = button.get("action").cloned().unwrap_or(Value::Null);
    let action_cluster = action
        .get("cluster")
        .and_then(parse_string)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "on_off".to_string())
        .to_lowercase();
    let action_command = action
        .get("command")
        .and_then(parse_string)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            if action_cluster == "identify" {
                "identify".to_string()
            } else {
                "toggle".to_string()
            }
        })
        .to_lowercase();

    let target_endpoint = action
        .get("target_endpoint")
        .and_then(parse_int)
        .or_else(|| button.get("target_endpoint").and_then(parse_int))
        .unwrap_or(0);
    let driver = action
        .get("driver")
        .and_then(parse_string)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            button
                .get("driver")
                .and_then(parse_string)
                .filter(|s| !s.is_empty())
        });

    Ok(Button {
        id: button.get("id").and_then(parse_string),
        gpio,
        active_level: button
            .get("active_level")
            .and_then(parse_int)
            .unwrap_or(defaults::BUTTON_ACTIVE_LEVEL),
        long_press_time_ms: button
            .get("long_press_time_ms")
            .and_then(parse_int)
            .unwrap_or(defaults::BUTTON_LONG_PRESS_TIME_MS),
        short_press_timeout_ms: button
            .get("short_press_timeout_ms")
            .and_then(parse_int)
            .unwrap_or(defaults::BUTTON_SHORT_PRESS_TIMEOUT_MS),
        identify_trigger_count: button
            .get("identify_trigger_count")
            .and_then(parse_int)
            .unwrap_or(defaults::BUTTON_IDENTIFY_TRIGGER_COUNT),
        identify_time_s,
        mode,
        action_cluster,
        action_command,
        action_identify_time_s: action
            .get("identify_time_s")
            .and_then(parse_int)
            .unwrap_or(identify_time_s),
        binding_endpoint: button
            .get("binding_endpoint")
            .and_then(parse_int)
            .unwrap_or(0) as u16,
        target_endpoint: target_endpoint as u16,
        driver,
    })
}

fn normalize_endpoints(endpoints: Option<&Value>) -> Result<Vec<Endpoint>, NormalizeError> {
    let entries = endpoints
        .and_then(Value::as_sequence)
        .cloned()
        .unwrap_or_default();

    let parsed: Vec<Endpoint> = entries
        .iter()
        .map(parse_endpoint_entry)
        .collect::<Result<_, _>>()?;

    let mut seen = HashSet::new();
    for endpoint in &parsed {
        if !seen.insert(endpoint.id) {
            return Err(NormalizeError::DuplicateEndpointId(endpoint.id));
        }
    }
    Ok(parsed)
}

fn parse_endpoint_entry(endpoint: &Value) -> Result<Endpoint, NormalizeError> {
    let id = endpoint
        .get("id")
        .and_then(parse_int)
        .ok_or(NormalizeError::EndpointMissingId)? as u16;
    let device_type = endpoint
        .get("device_type")
        .and_then(parse_string)
        .unwrap_or_else(|| defaults::ENDPOINT_DEVICE_TYPE.to_string());
    let kind = DeviceKind::from_name(&device_type);

    let clusters = endpoint.get("clusters");
    let (identify_present, identify_enabled, identify_data) = cluster_entry(clusters, "identify");
    let (groups_present, groups_enabled, _) = cluster_entry(clusters, "groups");
    let (scenes_present, scenes_enabled, scenes_data) =
        cluster_entry(clusters, "scenes_management");
    let (on_off_present, on_off_enabled, on_off_data) = cluster_entry(clusters, "on_off");
    let (level_present, level_enabled, level_data) = cluster_entry(clusters, "level_control");
    let (color_present, color_enabled, color_data) = cluster_entry(clusters, "color_control");

    Ok(Endpoint {
        id,
        identify: IdentifyCluster {
            present: identify_present,
            enabled: identify_enabled,
            identify_time: identify_data.get("identify_time").and_then(parse_int),
            identify_type: identify_data.get("identify_type").and_then(parse_int),
        },
        groups: GroupsCluster {
            present: groups_present,
            enabled: groups_enabled,
        },
        scenes_management: ScenesManagementCluster {
            present: scenes_present,
            enabled: scenes_enabled,
            scene_table_size: scenes_data.get("scene_table_size").and_then(parse_int),
        },
        on_off: OnOffCluster {
            present: on_off_present,
            enabled: on_off_enabled,
            state: extract_on_off_state(&on_off_data),
            features: cluster_features(kind, ClusterKind::OnOff, &on_off_data),
        },
        level_control: LevelControlCluster {
            present: level_present,
            enabled: level_enabled,
            current_level: level_data.get("current_level").and_then(parse_int),
            options: level_data.get("options").and_then(parse_int),
            on_level: level_data.get("on_level").and_then(parse_int),
            features: cluster_features(kind, ClusterKind::LevelControl, &level_data),
        },
        color_control: ColorControlCluster {
            present: color_present,
            enabled: color_enabled,
            color_mode: parse_color_mode(color_data.get("color_mode"))?,
            enhanced_color_mode: parse_color_mode(color_data.get("enhanced_color_mode"))?,
            current_hue: color_data.get("current_hue").and_then(parse_int),
            current_saturation: color_data.get("current_saturation").and_then(parse_int),
            color_temperature_mireds: color_data
                .get("color_temperature_mireds")
                .and_then(parse_int),
            remaining_time: color_data.get("remaining_time").and_then(parse_int),
            features: cluster_features(kind, ClusterKind::ColorControl, &color_data),
        },
        device_type,
    })
}

/// Fold the three accepted cluster value shapes (mapping, bare scalar, null)
/// into `(present, explicit_enabled, remaining_data)`.
fn cluster_entry(clusters: Option<&Value>, key: &str) -> (bool, Option<bool>, Value) {
    let raw = match clusters.and_then(|c| c.get(key)) {
        Some(raw) => raw,
        None => return (false, None, Value::Null),
    };
    match raw {
        Value::Mapping(mapping) => {
            let enabled = raw.get("enabled").and_then(parse_bool);
            let data: Mapping = mapping
                .iter()
                .filter(|(k, _)| k.as_str() != Some("enabled"))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            (true, enabled, Value::Mapping(data))
        }
        Value::Bool(b) => (true, Some(*b), Value::Null),
        Value::Null => (true, None, Value::Null),
        other => (true, parse_bool(other), Value::Null),
    }
}

/// First matching key wins: `state`, then `on`, then `on_off`.
fn extract_on_off_state(data: &Value) -> Option<bool> {
    for key in ["state", "on", "on_off"] {
        if let Some(raw) = data.get(key) {
            return parse_bool(raw);
        }
    }
    None
}

/// An explicit `features` list is used verbatim (first occurrence wins);
/// otherwise the device kind's default feature set applies.
fn cluster_features(kind: Option<DeviceKind>, cluster: ClusterKind, data: &Value) -> Vec<String> {
    match data.get("features") {
        Some(features) if !features.is_null() => {
            parse_string_list(Some(features)).into_iter().unique().collect()
        }
        _ => kind
            .map(|kind| {
                defaults::default_features(kind, cluster)
                    .iter()
                    .map(|feature| feature.to_string())
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn parse_color_mode(raw: Option<&Value>) -> Result<Option<ColorMode>, NormalizeError> {
    match raw.and_then(parse_string) {
        None => Ok(None),
        Some(name) => ColorMode::from_name(&name).map(Some).ok_or_else(|| {
            NormalizeError::UnsupportedColorMode {
                value: name,
                allowed: ColorMode::ALL.iter().map(|m| m.as_str()).join(", "),
            }
        }),
    }
}
