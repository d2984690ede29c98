use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

const IDF_TOOL: &str = "idf.py";

/// Run `idf.py` with the given arguments in the project directory, inheriting
/// stdout/stderr so build output streams straight to the user.
pub fn run_idf(args: &[&str], project_dir: &Path) -> Result<()> {
    log::info!(
        "Running {} {} in {}",
        IDF_TOOL,
        args.join(" "),
        project_dir.display()
    );
    let status = Command::new(IDF_TOOL)
        .args(args)
        .current_dir(project_dir)
        .status()
        .with_context(|| format!("could not run {IDF_TOOL}; is ESP-IDF on the PATH?"))?;
    if !status.success() {
        bail!("{} {} failed with {}", IDF_TOOL, args.join(" "), status);
    }
    Ok(())
}
