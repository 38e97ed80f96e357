use crate::cli::{CheckOptions, ConvertOptions, InfoOptions};
use base::Endianness;
use std::path::PathBuf;

/// Scatfun command line interface arguments.
#[derive(clap::Parser, Debug)]
#[clap(
    author,
    version,
    about = "Inspects, checks and converts tabulated Fourier BSDF (SCATFUN) files."
)]
pub struct CliArgs {
    /// Whether to print verbose information to stdout.
    #[clap(short, long, help = "Use verbose output (log level = 4)")]
    pub verbose: bool,

    /// Whether to show the timestamp in the log.
    #[clap(
        long,
        help = "Show timestamp for each log message in seconds since\nprogram starts"
    )]
    pub log_timestamp: bool,

    /// Verbosity level for the log.
    #[clap(
        long,
        help = "Setting logging verbosity level (higher for more\ndetails)\n  0 - error\n  1 - \
                warn + error\n  2 - info + warn + error\n  3 - debug + info + warn + error\n  4 - \
                trace + debug + info + warn + error\n\x08",
        default_value_t = 1
    )]
    pub log_level: u8,

    /// Path to the user config file. If not specified, scatfun will
    /// look for `scatfun.toml` in the working and configuration directories.
    #[clap(short, long, help = "Path to the user config file")]
    pub config: Option<PathBuf>,

    /// Byte order of the input files, overriding the config file.
    #[clap(long, value_enum, help = "Byte order of the input files")]
    pub byte_order: Option<Endianness>,

    /// Command to execute.
    #[clap(subcommand)]
    pub command: SubCommand,
}

/// Scatfun command.
#[derive(clap::Subcommand, Debug)]
pub enum SubCommand {
    /// Prints the header and statistics of tabulated BSDF files.
    Info(InfoOptions),

    /// Loads tabulated BSDF files and reports the ones that are rejected.
    Check(CheckOptions),

    /// Rewrites a tabulated BSDF file in another byte order.
    Convert(ConvertOptions),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli() { CliArgs::command().debug_assert(); }

    #[test]
    fn parse_convert() {
        let args = CliArgs::try_parse_from([
            "scatfun",
            "--byte-order",
            "be",
            "convert",
            "in.bsdf",
            "-o",
            "out.bsdf",
            "--to",
            "little",
        ])
        .unwrap();
        assert_eq!(args.byte_order, Some(Endianness::Big));
        match args.command {
            SubCommand::Convert(opts) => {
                assert_eq!(opts.input, PathBuf::from("in.bsdf"));
                assert_eq!(opts.output, PathBuf::from("out.bsdf"));
                assert_eq!(opts.to, Endianness::Little);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }
}
