use crate::{cli::ansi, config::Config, error::CliError};
use base::Endianness;
use bsdf::FourierBsdfTable;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[clap(about = "Rewrites a tabulated BSDF file in another byte order.")]
pub struct ConvertOptions {
    /// Filepath to the table to convert.
    pub input: PathBuf,

    /// Filepath of the converted table.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Byte order of the converted table.
    #[arg(long, value_enum, default_value = "little")]
    pub to: Endianness,
}

/// Loads the input with the configured byte order and saves it in the
/// requested one.
pub fn convert(opts: ConvertOptions, config: Config) -> Result<(), CliError> {
    let input = config.resolve_path(&opts.input).ok_or_else(|| {
        CliError::new(format!("File \"{}\" not found", opts.input.display()), None)
    })?;
    println!(
        "{}>{} Converting {} ({}) to {} ({})...",
        ansi::BRIGHT_YELLOW,
        ansi::RESET,
        input.display(),
        config.byte_order(),
        opts.output.display(),
        opts.to
    );
    let table = FourierBsdfTable::load_with_byte_order(&input, config.byte_order())
        .map_err(|err| CliError::from_load_error(err, "Failed to convert tabulated BSDF"))?;
    table.save(&opts.output, opts.to).map_err(|err| {
        CliError::from_io_error(
            err,
            format!("Failed to save to \"{}\"", opts.output.display()),
        )
    })?;
    println!("  {} Done", ansi::CYAN_CHECK);
    Ok(())
}
