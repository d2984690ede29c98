use std::fs;

use anyhow::Result;

use crate::argsets::NormalizeArgs;
use crate::config;

pub fn normalize(args: NormalizeArgs) -> Result<()> {
    let doc = config::load_document(&args.config)?;
    if doc.get("app").is_some() {
        config::schema::validate_document(&doc)?;
    }
    let cfg = config::normalize::normalize_document(&doc)?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&args.output, serde_yaml_ng::to_string(&cfg)?)?;
    println!("Normalized configuration written to {}", args.output.display());
    Ok(())
}
