use anyhow::Result;

use crate::argsets::BuildArgs;
use crate::helpers;

pub fn build(args: BuildArgs) -> Result<()> {
    helpers::run_idf(&["reconfigure"], &args.project)?;
    helpers::run_idf(&["build"], &args.project)
}
