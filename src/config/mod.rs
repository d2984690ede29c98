pub mod model;
pub mod normalize;
pub mod schema;
pub mod value;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub fn load_document(path: &Path) -> Result<serde_yaml_ng::Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    serde_yaml_ng::from_str(&raw)
        .with_context(|| format!("could not parse {} as YAML", path.display()))
}
