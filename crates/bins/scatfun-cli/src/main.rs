//! `scatfun` inspects, checks and converts tabulated Fourier BSDF files.
#![warn(clippy::all, rust_2021_compatibility)]

mod args;
mod cli;
mod config;
mod error;

use args::CliArgs;
use config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, launch_time) = base::cli::parse_args::<CliArgs>();
    let log_level = if args.verbose { 4 } else { args.log_level };
    base::cli::setup_logging(args.log_timestamp.then_some(launch_time), log_level);
    base::cli::log_launch("scatfun", launch_time);

    let mut config = Config::load_config(args.config.as_deref())?;
    if let Some(order) = args.byte_order {
        config.user.byte_order = order;
    }
    log::debug!("{config}");

    cli::run(args.command, config)?;
    Ok(())
}
