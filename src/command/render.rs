use std::fs;

use anyhow::Result;
use serde_json::json;

use crate::argsets::RenderArgs;
use crate::codegen::{manifest, render::Renderer};
use crate::config;
use crate::helpers::base_path;

pub fn render(args: RenderArgs) -> Result<()> {
    let doc = config::load_document(&args.config)?;
    config::schema::validate_document(&doc)?;
    let cfg = config::normalize::normalize_document(&doc)?;
    let context = json!({ "app": serde_json::to_value(&cfg)? });

    let manifest_doc = config::load_document(&base_path::TEMPLATES_DIR.join("manifest.yaml"))?;
    let entries = manifest::resolve_templates(&manifest_doc, &context);
    let renderer = Renderer::new(base_path::TEMPLATES_DIR.as_path());

    fs::create_dir_all(&args.out_dir)?;
    for entry in &entries {
        let view = match &entry.context {
            Some(path) => manifest::get_nested(&context, path)
                .cloned()
                .unwrap_or(serde_json::Value::Null),
            None => context.clone(),
        };
        let text = renderer.render(&entry.template, &view)?;
        let destination = args.out_dir.join(&entry.output);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, text)?;
        log::info!("Rendered {} -> {}", entry.template, destination.display());
    }

    let main_dir = args.out_dir.join("main");
    let src_dir = if main_dir.is_dir() { main_dir } else { args.out_dir.clone() };
    println!("{}", src_dir.display());
    Ok(())
}
