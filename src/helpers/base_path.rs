use std::{env, path::PathBuf};

use once_cell::sync::Lazy;

use crate::constants::envvars;

pub static ROOT_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(root_dir) = env::var(envvars::ROOT_DIR) {
        return root_dir.into();
    }
    PathBuf::from(".")
});

pub static RESOURCES_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(resources_dir) = env::var(envvars::RESOURCES_DIR) {
        return resources_dir.into();
    }
    ROOT_DIR.join("resources")
});

pub static TEMPLATES_DIR: Lazy<PathBuf> = Lazy::new(|| RESOURCES_DIR.join("templates"));
