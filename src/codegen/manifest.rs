//! Template manifest resolution.
//!
//! The manifest is a YAML document of named blocks, each optionally guarded by
//! a `when` predicate and carrying a list of template entries with their own
//! optional guards. Both guards must pass for an entry to be selected, and
//! selection follows manifest declaration order. Malformed blocks or entries
//! are skipped rather than aborting the run.

use serde_json::Value as Json;
use serde_yaml_ng::Value as Yaml;

#[derive(Clone, Debug, PartialEq)]
pub struct TemplateEntry {
    pub template: String,
    pub output: String,
    /// Dotted path selecting the context sub-tree to render with;
    /// the full context when absent.
    pub context: Option<String>,
}

pub fn resolve_templates(manifest: &Yaml, context: &Json) -> Vec<TemplateEntry> {
    let mut selected = Vec::new();
    let blocks = match manifest.as_mapping() {
        Some(blocks) => blocks,
        None => return selected,
    };
    for (name, block) in blocks {
        if block.as_mapping().is_none() {
            continue;
        }
        if !matches_when(block.get("when"), context) {
            continue;
        }
        let entries = match block.get("templates").and_then(Yaml::as_sequence) {
            Some(entries) => entries,
            None => continue,
        };
        for entry in entries {
            if entry.as_mapping().is_none() {
                continue;
            }
            if !matches_when(entry.get("when"), context) {
                continue;
            }
            let template = entry.get("template").and_then(Yaml::as_str);
            let output = entry.get("output").and_then(Yaml::as_str);
            match (template, output) {
                (Some(template), Some(output)) => selected.push(TemplateEntry {
                    template: template.to_string(),
                    output: output.to_string(),
                    context: entry
                        .get("context")
                        .and_then(Yaml::as_str)
                        .map(str::to_string),
                }),
                _ => log::warn!(
                    "skipping manifest entry without template/output in block {:?}",
                    name.as_str().unwrap_or("?")
                ),
            }
        }
    }
    selected
}

/// A predicate matches iff every dotted path resolves to exactly the literal
/// given. A missing path never matches; an absent or empty predicate always
/// does.
fn matches_when(when: Option<&Yaml>, context: &Json) -> bool {
    let when = match when {
        Some(when) => when,
        None => return true,
    };
    if when.is_null() {
        return true;
    }
    let conditions = match when.as_mapping() {
        Some(conditions) => conditions,
        None => return false,
    };
    for (key, expected) in conditions {
        let key = match key.as_str() {
            Some(key) => key,
            None => return false,
        };
        let expected = match serde_json::to_value(expected) {
            Ok(expected) => expected,
            Err(_) => return false,
        };
        match get_nested(context, key) {
            Some(actual) if *actual == expected => {}
            _ => return false,
        }
    }
    true
}

/// Traverse a dotted path through nested objects.
pub fn get_nested<'a>(value: &'a Json, path: &str) -> Option<&'a Json> {
    let mut current = value;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(raw: &str) -> Yaml {
        serde_yaml_ng::from_str(raw).unwrap()
    }

    fn outputs(manifest_raw: &str, context: &Json) -> Vec<String> {
        resolve_templates(&manifest(manifest_raw), context)
            .into_iter()
            .map(|entry| entry.output)
            .collect()
    }

    const MANIFEST: &str = r#"
project:
  templates:
    - template: CMakeLists.txt.j2
      output: CMakeLists.txt
    - template: switch.h.j2
      output: main/switch.h
      when:
        app.device_type: switch
thread:
  when:
    app.network.connectivity: thread
  templates:
    - template: thread.h.j2
      output: main/thread.h
"#;

    #[test]
    fn entry_guard_selects_on_exact_match() {
        let ctx = json!({"app": {"device_type": "switch", "network": {"connectivity": "wifi"}}});
        assert_eq!(outputs(MANIFEST, &ctx), vec!["CMakeLists.txt", "main/switch.h"]);
    }

    #[test]
    fn block_guard_excludes_all_entries() {
        let ctx = json!({"app": {"device_type": "light", "network": {"connectivity": "wifi"}}});
        assert_eq!(outputs(MANIFEST, &ctx), vec!["CMakeLists.txt"]);

        let ctx = json!({"app": {"device_type": "light", "network": {"connectivity": "thread"}}});
        assert_eq!(outputs(MANIFEST, &ctx), vec!["CMakeLists.txt", "main/thread.h"]);
    }

    #[test]
    fn missing_path_never_matches() {
        let ctx = json!({"app": {}});
        assert_eq!(outputs(MANIFEST, &ctx), vec!["CMakeLists.txt"]);
    }

    #[test]
    fn malformed_blocks_are_skipped() {
        let raw = r#"
bogus: 42
project:
  templates:
    - template: a.j2
      output: a
    - not a mapping
"#;
        let ctx = json!({"app": {}});
        assert_eq!(outputs(raw, &ctx), vec!["a"]);
    }

    #[test]
    fn entry_context_subtree_is_captured() {
        let raw = r#"
project:
  templates:
    - template: leds.j2
      output: leds.txt
      context: app.led_strip
"#;
        let ctx = json!({"app": {"led_strip": {"led_count": 3}}});
        let entries = resolve_templates(&manifest(raw), &ctx);
        assert_eq!(entries[0].context.as_deref(), Some("app.led_strip"));
        assert_eq!(
            get_nested(&ctx, "app.led_strip"),
            Some(&json!({"led_count": 3}))
        );
    }

    #[test]
    fn selection_follows_declaration_order() {
        let raw = r#"
zeta:
  templates:
    - template: z.j2
      output: z
alpha:
  templates:
    - template: a.j2
      output: a
"#;
        let ctx = json!({});
        assert_eq!(outputs(raw, &ctx), vec!["z", "a"]);
    }
}
