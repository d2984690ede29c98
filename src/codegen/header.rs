//! Generated-header emission.
//!
//! The header is written directly rather than through the template engine:
//! its struct layout has to mirror the configuration model field for field,
//! and every absent optional must stay distinguishable from an explicit zero
//! once it lands in firmware. Absent values emit `{false, 0}` /
//! `{false, false}` / `{false, nullptr}` sentinel pairs, never a bare zero.

use crate::config::model::{AppConfig, Endpoint};

pub fn emit_header(cfg: &AppConfig) -> String {
    let button_count = cfg.buttons.len();
    let led_strip_count = cfg.led_strip.as_ref().map(|l| l.led_count).unwrap_or(0);

    let mut out = String::new();
    out.push_str("#pragma once\n\n");
    out.push_str("#include <stddef.h>\n");
    out.push_str("#include <stdint.h>\n\n");
    out.push_str("// This file is generated automatically. Do not edit.\n\n");

    let has_thread = cfg.network.connectivity.uses_thread();
    out.push_str(&format!(
        "#define APP_NETWORK_CONNECTIVITY_THREAD {}\n",
        u8::from(has_thread)
    ));
    out.push_str(&format!("#define BUTTON_COUNT {button_count}\n"));
    out.push_str(&format!("#define LED_STRIP_LED_COUNT {led_strip_count}\n"));
    out.push_str(&format!("#define FLASH_SIZE_MB {}\n\n", cfg.flash.size.megabytes()));

    if button_count > 0 {
        emit_button_namespace(&mut out, cfg);
    }

    if led_strip_count > 0 {
        if let Some(led_strip) = &cfg.led_strip {
            out.push_str("namespace generated_config::led_strip {\n");
            out.push_str(&format!(
                "inline constexpr int rmt_gpio = {};\n",
                led_strip.rmt_gpio
            ));
            out.push_str(&format!(
                "inline constexpr const char *type = \"{}\";\n",
                cpp_string(&led_strip.kind)
            ));
            out.push_str("} // namespace generated_config::led_strip\n\n");
        }
    }

    out.push_str("namespace generated_config {\n\n");
    out.push_str(&format!(
        "inline constexpr const char *device_type = \"{}\";\n",
        cpp_string(&cfg.device_type)
    ));
    out.push_str(&format!(
        "inline constexpr const char *device_name = \"{}\";\n\n",
        cpp_string(&cfg.device_name)
    ));

    emit_struct_definitions(&mut out);
    emit_feature_arrays(&mut out, &cfg.endpoints);
    emit_endpoint_array(&mut out, &cfg.endpoints);

    out.push_str("inline constexpr uint8_t num_endpoints = sizeof(endpoints) / sizeof(endpoint_raw);\n\n");
    out.push_str("} // namespace generated_config\n");
    out
}

fn emit_button_namespace(out: &mut String, cfg: &AppConfig) {
    out.push_str("namespace generated_config::button {\n");
    out.push_str("struct config_t {\n");
    out.push_str("    const char *id;\n");
    out.push_str("    int gpio;\n");
    out.push_str("    int active_level;\n");
    out.push_str("    int long_press_time_ms;\n");
    out.push_str("    int short_press_timeout_ms;\n");
    out.push_str("    int identify_trigger_count;\n");
    out.push_str("    int identify_time_s;\n");
    out.push_str("    const char *mode;\n");
    out.push_str("    const char *action_cluster;\n");
    out.push_str("    const char *action_command;\n");
    out.push_str("    int action_identify_time_s;\n");
    out.push_str("    uint16_t binding_endpoint;\n");
    out.push_str("    uint16_t target_endpoint;\n");
    out.push_str("    const char *driver;\n");
    out.push_str("};\n\n");
    out.push_str(&format!("inline constexpr size_t count = {};\n", cfg.buttons.len()));
    out.push_str("inline constexpr config_t configs[] = {\n");
    for button in &cfg.buttons {
        out.push_str("    {\n");
        out.push_str(&format!("        .id = {},\n", opt_c_string(button.id.as_deref())));
        out.push_str(&format!("        .gpio = {},\n", button.gpio));
        out.push_str(&format!("        .active_level = {},\n", button.active_level));
        out.push_str(&format!(
            "        .long_press_time_ms = {},\n",
            button.long_press_time_ms
        ));
        out.push_str(&format!(
            "        .short_press_timeout_ms = {},\n",
            button.short_press_timeout_ms
        ));
        out.push_str(&format!(
            "        .identify_trigger_count = {},\n",
            button.identify_trigger_count
        ));
        out.push_str(&format!("        .identify_time_s = {},\n", button.identify_time_s));
        out.push_str(&format!(
            "        .mode = \"{}\",\n",
            cpp_string(button.mode.as_str())
        ));
        out.push_str(&format!(
            "        .action_cluster = \"{}\",\n",
            cpp_string(&button.action_cluster)
        ));
        out.push_str(&format!(
            "        .action_command = \"{}\",\n",
            cpp_string(&button.action_command)
        ));
        out.push_str(&format!(
            "        .action_identify_time_s = {},\n",
            button.action_identify_time_s
        ));
        out.push_str(&format!(
            "        .binding_endpoint = static_cast<uint16_t>({}),\n",
            button.binding_endpoint
        ));
        out.push_str(&format!(
            "        .target_endpoint = static_cast<uint16_t>({}),\n",
            button.target_endpoint
        ));
        out.push_str(&format!(
            "        .driver = {},\n",
            opt_c_string(button.driver.as_deref())
        ));
        out.push_str("    },\n");
    }
    out.push_str("};\n");
    out.push_str("} // namespace generated_config::button\n\n");
}

fn emit_struct_definitions(out: &mut String) {
    out.push_str("struct optional_bool {\n    bool has_value;\n    bool value;\n};\n\n");
    out.push_str("struct optional_int {\n    bool has_value;\n    int32_t value;\n};\n\n");
    out.push_str("struct optional_string {\n    bool has_value;\n    const char *value;\n};\n\n");
    out.push_str("struct string_list {\n    size_t count;\n    const char *const *items;\n};\n\n");

    out.push_str("struct identify_cluster_raw {\n    bool present;\n    optional_bool enabled;\n    optional_int identify_time;\n    optional_int identify_type;\n};\n\n");
    out.push_str("struct groups_cluster_raw {\n    bool present;\n    optional_bool enabled;\n};\n\n");
    out.push_str("struct scenes_management_cluster_raw {\n    bool present;\n    optional_bool enabled;\n    optional_int scene_table_size;\n};\n\n");
    out.push_str("struct on_off_cluster_raw {\n    bool present;\n    optional_bool enabled;\n    optional_bool state;\n    string_list features;\n};\n\n");
    out.push_str("struct level_control_cluster_raw {\n    bool present;\n    optional_bool enabled;\n    optional_int current_level;\n    optional_int options;\n    optional_int on_level;\n    string_list features;\n};\n\n");
    out.push_str("struct color_control_cluster_raw {\n    bool present;\n    optional_bool enabled;\n    optional_string color_mode;\n    optional_string enhanced_color_mode;\n    optional_int current_hue;\n    optional_int current_saturation;\n    optional_int color_temperature_mireds;\n    optional_int remaining_time;\n    string_list features;\n};\n\n");
    out.push_str("struct endpoint_raw {\n    uint16_t id;\n    const char *device_type;\n    identify_cluster_raw identify;\n    groups_cluster_raw groups;\n    scenes_management_cluster_raw scenes_management;\n    on_off_cluster_raw on_off;\n    level_control_cluster_raw level_control;\n    color_control_cluster_raw color_control;\n};\n\n");
}

fn feature_array_name(endpoint_index: usize, cluster: &str) -> String {
    format!("kEndpoint{endpoint_index}_{cluster}_features")
}

fn endpoint_feature_lists(endpoint: &Endpoint) -> [(&'static str, &Vec<String>); 3] {
    [
        ("on_off", &endpoint.on_off.features),
        ("level_control", &endpoint.level_control.features),
        ("color_control", &endpoint.color_control.features),
    ]
}

fn emit_feature_arrays(out: &mut String, endpoints: &[Endpoint]) {
    let mut emitted_any = false;
    for (index, endpoint) in endpoints.iter().enumerate() {
        for (cluster, features) in endpoint_feature_lists(endpoint) {
            if features.is_empty() {
                continue;
            }
            let items = features
                .iter()
                .map(|feature| format!("\"{}\"", cpp_string(feature)))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "inline constexpr const char *{}[] = {{{items}}};\n",
                feature_array_name(index, cluster)
            ));
            emitted_any = true;
        }
    }
    if emitted_any {
        out.push('\n');
    }
}

fn features_literal(endpoint_index: usize, cluster: &str, features: &[String]) -> String {
    if features.is_empty() {
        "{ 0, nullptr }".to_string()
    } else {
        format!(
            "{{ {}, {} }}",
            features.len(),
            feature_array_name(endpoint_index, cluster)
        )
    }
}

fn emit_endpoint_array(out: &mut String, endpoints: &[Endpoint]) {
    out.push_str("inline constexpr endpoint_raw endpoints[] = {\n");
    for (index, ep) in endpoints.iter().enumerate() {
        out.push_str("    {\n");
        out.push_str(&format!("        .id = {},\n", ep.id));
        out.push_str(&format!(
            "        .device_type = \"{}\",\n",
            cpp_string(&ep.device_type)
        ));

        out.push_str("        .identify = {\n");
        out.push_str(&format!("            .present = {},\n", ep.identify.present));
        out.push_str(&format!("            .enabled = {},\n", opt_bool(ep.identify.enabled)));
        out.push_str(&format!(
            "            .identify_time = {},\n",
            opt_int(ep.identify.identify_time)
        ));
        out.push_str(&format!(
            "            .identify_type = {},\n",
            opt_int(ep.identify.identify_type)
        ));
        out.push_str("        },\n");

        out.push_str("        .groups = {\n");
        out.push_str(&format!("            .present = {},\n", ep.groups.present));
        out.push_str(&format!("            .enabled = {},\n", opt_bool(ep.groups.enabled)));
        out.push_str("        },\n");

        out.push_str("        .scenes_management = {\n");
        out.push_str(&format!(
            "            .present = {},\n",
            ep.scenes_management.present
        ));
        out.push_str(&format!(
            "            .enabled = {},\n",
            opt_bool(ep.scenes_management.enabled)
        ));
        out.push_str(&format!(
            "            .scene_table_size = {},\n",
            opt_int(ep.scenes_management.scene_table_size)
        ));
        out.push_str("        },\n");

        out.push_str("        .on_off = {\n");
        out.push_str(&format!("            .present = {},\n", ep.on_off.present));
        out.push_str(&format!("            .enabled = {},\n", opt_bool(ep.on_off.enabled)));
        out.push_str(&format!("            .state = {},\n", opt_bool(ep.on_off.state)));
        out.push_str(&format!(
            "            .features = {},\n",
            features_literal(index, "on_off", &ep.on_off.features)
        ));
        out.push_str("        },\n");

        out.push_str("        .level_control = {\n");
        out.push_str(&format!("            .present = {},\n", ep.level_control.present));
        out.push_str(&format!(
            "            .enabled = {},\n",
            opt_bool(ep.level_control.enabled)
        ));
        out.push_str(&format!(
            "            .current_level = {},\n",
            opt_int(ep.level_control.current_level)
        ));
        out.push_str(&format!(
            "            .options = {},\n",
            opt_int(ep.level_control.options)
        ));
        out.push_str(&format!(
            "            .on_level = {},\n",
            opt_int(ep.level_control.on_level)
        ));
        out.push_str(&format!(
            "            .features = {},\n",
            features_literal(index, "level_control", &ep.level_control.features)
        ));
        out.push_str("        },\n");

        out.push_str("        .color_control = {\n");
        out.push_str(&format!("            .present = {},\n", ep.color_control.present));
        out.push_str(&format!(
            "            .enabled = {},\n",
            opt_bool(ep.color_control.enabled)
        ));
        out.push_str(&format!(
            "            .color_mode = {},\n",
            opt_str(ep.color_control.color_mode.map(|m| m.as_str()))
        ));
        out.push_str(&format!(
            "            .enhanced_color_mode = {},\n",
            opt_str(ep.color_control.enhanced_color_mode.map(|m| m.as_str()))
        ));
        out.push_str(&format!(
            "            .current_hue = {},\n",
            opt_int(ep.color_control.current_hue)
        ));
        out.push_str(&format!(
            "            .current_saturation = {},\n",
            opt_int(ep.color_control.current_saturation)
        ));
        out.push_str(&format!(
            "            .color_temperature_mireds = {},\n",
            opt_int(ep.color_control.color_temperature_mireds)
        ));
        out.push_str(&format!(
            "            .remaining_time = {},\n",
            opt_int(ep.color_control.remaining_time)
        ));
        out.push_str(&format!(
            "            .features = {},\n",
            features_literal(index, "color_control", &ep.color_control.features)
        ));
        out.push_str("        },\n");

        out.push_str("    }");
        if index + 1 < endpoints.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("};\n\n");
}

fn opt_bool(value: Option<bool>) -> String {
    match value {
        None => "{false, false}".to_string(),
        Some(value) => format!("{{true, {value}}}"),
    }
}

fn opt_int(value: Option<i64>) -> String {
    match value {
        None => "{false, 0}".to_string(),
        Some(value) => format!("{{true, {value}}}"),
    }
}

fn opt_str(value: Option<&str>) -> String {
    match value {
        None => "{false, nullptr}".to_string(),
        Some(value) => format!("{{true, \"{}\"}}", cpp_string(value)),
    }
}

/// An omitted or empty string emits as a null pointer.
fn opt_c_string(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => format!("\"{}\"", cpp_string(value)),
        _ => "nullptr".to_string(),
    }
}

fn cpp_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
