use anyhow::Result;

use crate::argsets::ValidateArgs;
use crate::config;

pub fn validate(args: ValidateArgs) -> Result<()> {
    let doc = config::load_document(&args.config)?;
    config::schema::validate_document(&doc)?;
    println!("ok");
    Ok(())
}
