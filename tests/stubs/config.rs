#![allow(dead_code)]
// This is infuriating, but rust-analyzer seems to arbitrarily think
// that some of these are unused; hence the warning suppression

pub const LIGHT_CONFIG: &str = r#"
app:
  device_type: light
  device_name: Bench Lamp
  flash_size: 8mb
  network:
    connectivity: wifi
  led_strip:
    led_count: 24
    rmt_gpio: 8
    type: ws2812
  buttons:
    - id: main
      gpio: 4
      active_level: 1
  endpoints:
    - id: 1
      device_type: extended_color_light
      clusters:
        identify:
          identify_time: 5
        groups: true
        on_off:
          state: true
        color_control:
          color_mode: kXY
          current_hue: 120
"#;

pub const SWITCH_LEGACY_CONFIG: &str = r#"
app:
  device_type: switch
  device_name: Wall Switch
  button:
    gpio: 9
  endpoints:
    - id: 1
      device_type: on_off_light
      clusters:
        on_off:
"#;

pub const THREAD_CONFIG: &str = r#"
app:
  device_type: light
  device_name: Thread Bulb
  flash_size: "4"
  network:
    connectivity: thread
  endpoints:
    - id: 1
      device_type: dimmable_light
"#;

pub const BAD_CONFIG: &str = r#"
app:
  device_type: 7
  endpoints:
    - device_type: on_off_light
  led_strip:
    led_count: many
"#;
