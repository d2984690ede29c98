use anyhow::{anyhow, Result};
use env_logger::Env;

use yml2esp::constants::{defaults, envvars};
use yml2esp::{argsets, command, helpers};

const CMD_VALIDATE: &str = "validate";
const CMD_NORMALIZE: &str = "normalize";
const CMD_RENDER: &str = "render";
const CMD_EMIT: &str = "emit";
const CMD_BUILD: &str = "build";
const CMD_FLASH: &str = "flash";

fn main() -> Result<()> {
    helpers::load_dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some(CMD_VALIDATE) => command::validate(argsets::ValidateArgs {
            config: args.free_from_str()?,
        }),
        Some(CMD_NORMALIZE) => command::normalize(argsets::NormalizeArgs {
            config: args.free_from_str()?,
            output: args.free_from_str()?,
        }),
        Some(CMD_RENDER) => command::render(argsets::RenderArgs {
            out_dir: args.value_from_str("--out")?,
            config: args.free_from_str()?,
        }),
        Some(CMD_EMIT) => command::emit(argsets::EmitArgs {
            project_root: args.value_from_str("--project")?,
            normalized: args.free_from_str()?,
            header: args.free_from_str()?,
        }),
        Some(CMD_BUILD) => command::build(argsets::BuildArgs {
            project: args.value_from_str("--project")?,
        }),
        Some(CMD_FLASH) => command::flash(argsets::FlashArgs {
            project: args.value_from_str("--project")?,
            port: args.value_from_str("--port")?,
        }),
        _ => Err(anyhow!(
            "Subcommand must be one of 'validate', 'normalize', 'render', 'emit', 'build', 'flash'"
        )),
    }
}
