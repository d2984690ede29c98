use anyhow::Result;

use crate::argsets::FlashArgs;
use crate::helpers;

pub fn flash(args: FlashArgs) -> Result<()> {
    helpers::run_idf(&["-p", &args.port, "flash", "monitor"], &args.project)
}
