use crate::{cli::ansi, config::Config, error::CliError};
use base::{Endianness, Float};
use bsdf::{Channels, FourierBsdfTable, Header};
use std::{
    fmt::{Display, Formatter},
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

#[derive(clap::Args, Debug)]
#[clap(about = "Prints the header and statistics of tabulated BSDF files.")]
pub struct InfoOptions {
    /// Filepaths to the tables to inspect.
    #[arg(num_args(1..), required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Statistics over the pairs of elevations of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    /// Number of pairs storing no coefficients.
    pub n_empty: usize,
    /// Number of pairs.
    pub n_pairs: usize,
    /// Longest series actually stored.
    pub longest: usize,
    /// Smallest and largest first coefficient over the non-empty pairs.
    pub a0_range: Option<(Float, Float)>,
    /// Smallest and largest elevation cosine.
    pub mu_range: (Float, Float),
}

impl TableSummary {
    pub fn new(table: &FourierBsdfTable) -> Self {
        let mut a0_range: Option<(Float, Float)> = None;
        for (&m, &a0) in table.m().iter().zip(table.a0()) {
            if m == 0 {
                continue;
            }
            a0_range = Some(match a0_range {
                Some((lo, hi)) => (lo.min(a0), hi.max(a0)),
                None => (a0, a0),
            });
        }
        let mu = table.mu();
        Self {
            n_empty: table.m().iter().filter(|&&m| m == 0).count(),
            n_pairs: table.n_pairs(),
            longest: table.m().iter().copied().max().unwrap_or(0) as usize,
            a0_range,
            mu_range: (mu[0], mu[mu.len() - 1]),
        }
    }
}

impl Display for TableSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "    {} elevation cosines: {} ~ {}",
            ansi::CYAN_MINUS,
            self.mu_range.0,
            self.mu_range.1
        )?;
        writeln!(
            f,
            "    {} empty pairs      : {} / {}",
            ansi::CYAN_MINUS,
            self.n_empty,
            self.n_pairs
        )?;
        writeln!(
            f,
            "    {} longest series   : {}",
            ansi::CYAN_MINUS,
            self.longest
        )?;
        match self.a0_range {
            Some((lo, hi)) => writeln!(f, "    {} a0 range         : {} ~ {}", ansi::CYAN_MINUS, lo, hi),
            None => writeln!(f, "    {} a0 range         : -", ansi::CYAN_MINUS),
        }
    }
}

fn read_header(filepath: &Path, order: Endianness) -> Result<Header, CliError> {
    let file = File::open(filepath).map_err(|err| {
        CliError::from_io_error(err, format!("Failed to open \"{}\"", filepath.display()))
    })?;
    Header::read(&mut BufReader::new(file), order).map_err(|err| {
        CliError::new(
            format!("Failed to read header of \"{}\"", filepath.display()),
            Some(Box::new(err)),
        )
    })
}

/// Prints the header and statistics of every input.
///
/// Inputs that cannot be found or whose header cannot be read are reported
/// and skipped.
pub fn print_info(opts: InfoOptions, config: Config) -> Result<(), CliError> {
    let order = config.byte_order();
    for input in opts.inputs {
        let Some(filepath) = config.resolve_path(&input) else {
            eprintln!(
                "{} File \"{}\" not found",
                ansi::RED_EXCLAMATION,
                input.display()
            );
            continue;
        };
        log::debug!("Resolved path: {:?}", filepath);
        let header = match read_header(&filepath, order) {
            Ok(header) => header,
            Err(err) => {
                eprintln!("{} {}", ansi::RED_EXCLAMATION, err);
                continue;
            },
        };
        println!("{}>{} {}", ansi::BRIGHT_YELLOW, ansi::RESET, filepath.display());
        println!(
            "  {} flags: {:#x}, bases: {}, channels: {}, eta: {}, alpha: {:?}",
            ansi::CYAN_MINUS,
            header.flags,
            header.n_bases,
            header.n_channels,
            header.eta,
            header.alpha
        );
        println!(
            "  {} n_mu: {}, n_coeffs: {}, m_max: {}, metadata: {} bytes",
            ansi::CYAN_MINUS,
            header.n_mu,
            header.n_coeffs,
            header.m_max,
            header.n_metadata_bytes
        );

        match FourierBsdfTable::load_with_byte_order(&filepath, order) {
            Ok(table) => {
                let kind = match table.channels() {
                    Channels::Mono => "monochromatic",
                    Channels::Rgb => "RGB",
                };
                println!("  {} {} table", ansi::CYAN_CHECK, kind);
                print!("{}", TableSummary::new(&table));
            },
            Err(err) => {
                eprintln!("  {} {}", ansi::RED_EXCLAMATION, err.kind);
            },
        }
    }
    Ok(())
}
