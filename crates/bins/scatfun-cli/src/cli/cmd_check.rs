use crate::{
    cli::ansi,
    config::Config,
    error::CliError,
};
use bsdf::FourierBsdfTable;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[clap(about = "Loads tabulated BSDF files and reports the ones that are rejected.")]
pub struct CheckOptions {
    /// Filepaths to the tables to check.
    #[arg(num_args(1..), required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Loads every input and prints whether it is accepted.
///
/// Fails if at least one table is rejected.
pub fn check(opts: CheckOptions, config: Config) -> Result<(), CliError> {
    let order = config.byte_order();
    let total = opts.inputs.len();
    let mut n_failed = 0;
    for input in opts.inputs {
        let Some(filepath) = config.resolve_path(&input) else {
            eprintln!(
                "  {} \"{}\": file not found",
                ansi::RED_EXCLAMATION,
                input.display()
            );
            n_failed += 1;
            continue;
        };
        match FourierBsdfTable::load_with_byte_order(&filepath, order) {
            Ok(table) => println!(
                "  {} {} ({} elevations, {} coefficients)",
                ansi::CYAN_CHECK,
                filepath.display(),
                table.n_mu(),
                table.n_coeffs()
            ),
            Err(err) => {
                eprintln!("  {} {}", ansi::RED_EXCLAMATION, err);
                n_failed += 1;
            },
        }
    }

    if n_failed > 0 {
        return Err(CliError::new(
            format!("{n_failed} of {total} tabulated BSDF file(s) rejected"),
            None,
        ));
    }
    Ok(())
}
