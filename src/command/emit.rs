use std::fs;

use anyhow::Result;

use crate::argsets::EmitArgs;
use crate::codegen::header;
use crate::config;
use crate::helpers::base_path;
use crate::overlay;

pub fn emit(args: EmitArgs) -> Result<()> {
    let doc = config::load_document(&args.normalized)?;
    let cfg = config::normalize::normalize_document(&doc)?;

    let generated = header::emit_header(&cfg);
    if let Some(parent) = args.header.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&args.header, generated)?;

    overlay::apply_overlay(
        &args.project_root,
        base_path::RESOURCES_DIR.as_path(),
        cfg.network.connectivity,
        cfg.flash.size,
    )?;

    println!(
        "Generated {} from {}",
        args.header.display(),
        args.normalized.display()
    );
    Ok(())
}
