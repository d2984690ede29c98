use std::path::PathBuf;

pub struct ValidateArgs {
    pub config: PathBuf,
}

pub struct NormalizeArgs {
    pub config: PathBuf,
    pub output: PathBuf,
}

pub struct RenderArgs {
    pub out_dir: PathBuf,
    pub config: PathBuf,
}

pub struct EmitArgs {
    pub project_root: PathBuf,
    pub normalized: PathBuf,
    pub header: PathBuf,
}

pub struct BuildArgs {
    pub project: PathBuf,
}

pub struct FlashArgs {
    pub project: PathBuf,
    pub port: String,
}
