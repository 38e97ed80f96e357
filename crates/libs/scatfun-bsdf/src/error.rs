//! Errors raised while loading a tabulated BSDF.

use base::io::ReadWordsError;
use std::{
    fmt::{self, Display, Formatter},
    path::Path,
};

/// Error while loading a tabulated BSDF from a file.
#[derive(Debug, thiserror::Error)]
#[error("tabulated BSDF file \"{}\": {}", .path.display(), .kind)]
pub struct LoadError {
    /// Path to the file that caused the error.
    pub path: Box<Path>,
    /// Kind of error that occurred.
    pub kind: LoadErrorKind,
}

impl LoadError {
    /// Creates a new `LoadError` for the given file.
    pub fn new(path: impl AsRef<Path>, kind: LoadErrorKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf().into_boxed_path(),
            kind,
        }
    }

    /// Returns true if the file could not be opened or read.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, LoadErrorKind::Open(_) | LoadErrorKind::Read(_))
    }

    /// Returns true if the file is not a well-formed table.
    pub fn is_format(&self) -> bool { matches!(self.kind, LoadErrorKind::Format(_)) }

    /// Returns true if the file requests a feature the loader rejects.
    pub fn is_unsupported(&self) -> bool { matches!(self.kind, LoadErrorKind::Unsupported(_)) }
}

/// Kind of error that occurred while loading a table.
#[derive(Debug, thiserror::Error)]
pub enum LoadErrorKind {
    /// The file is missing, unreadable or permission is denied.
    #[error("cannot open file: {0}")]
    Open(#[source] std::io::Error),
    /// The file was opened but reading from it failed.
    #[error("read failure: {0}")]
    Read(#[source] std::io::Error),
    /// The file is not a structurally valid table.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The file is valid but requests an unimplemented feature.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedFeature),
}

impl From<std::io::Error> for LoadErrorKind {
    fn from(value: std::io::Error) -> Self { Self::Read(value) }
}

impl LoadErrorKind {
    /// Converts an error raised while reading the given section.
    pub(crate) fn from_section(section: Section, err: ReadWordsError) -> Self {
        match err {
            ReadWordsError::Truncated {
                expected,
                available,
            } => Self::Format(FormatError::Truncated {
                section,
                expected,
                available,
            }),
            ReadWordsError::Io(err) => Self::Read(err),
        }
    }
}

/// Sections of a table file, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// The fixed 64-byte header.
    Header,
    /// Cosines of the elevation angles.
    Mu,
    /// Cumulative distribution used for importance sampling.
    Cdf,
    /// Interleaved offset and length of every series.
    OffsetTable,
    /// Concatenated Fourier coefficients.
    Coefficients,
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => write!(f, "header"),
            Section::Mu => write!(f, "elevation cosines"),
            Section::Cdf => write!(f, "cumulative distribution"),
            Section::OffsetTable => write!(f, "offset/length table"),
            Section::Coefficients => write!(f, "coefficients"),
        }
    }
}

/// Structural problems of a table file.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// The file does not start with `SCATFUN`.
    #[error("invalid magic number, not a SCATFUN file")]
    InvalidMagic,
    /// The file format version is not supported.
    #[error("unsupported file format version {0}")]
    UnsupportedVersion(u8),
    /// A count in the header is negative or too large to address.
    #[error("invalid {field} count {value}")]
    InvalidCount {
        /// Name of the header field.
        field: &'static str,
        /// Value stored in the file.
        value: i64,
    },
    /// A section is shorter than its size declared in the header.
    #[error("truncated or corrupt file, {section} section expects {expected} bytes, only {available} available")]
    Truncated {
        /// The section being read.
        section: Section,
        /// Size of the section in bytes.
        expected: u64,
        /// Number of bytes present.
        available: u64,
    },
    /// The series of a pair of directions does not lie inside the coefficient
    /// buffer.
    #[error(
        "series of pair ({row}, {col}) at offset {offset} with {count} coefficients per channel \
         exceeds the {n_coeffs} stored coefficients"
    )]
    SeriesOutOfRange {
        /// Index of the incoming elevation.
        row: usize,
        /// Index of the outgoing elevation.
        col: usize,
        /// Offset stored in the file.
        offset: i32,
        /// Length stored in the file.
        count: i32,
        /// Number of coefficients in the file.
        n_coeffs: usize,
    },
    /// The series of a pair of directions is longer than the longest series
    /// declared in the header.
    #[error("series of pair ({row}, {col}) has {count} coefficients, more than the maximum {m_max}")]
    SeriesTooLong {
        /// Index of the incoming elevation.
        row: usize,
        /// Index of the outgoing elevation.
        col: usize,
        /// Length stored in the file.
        count: usize,
        /// Longest series declared in the header.
        m_max: usize,
    },
    /// The header declares a longest series that no pair stores.
    #[error("header declares series of up to {m_max} coefficients, the longest stored has {longest}")]
    MaxOrderTooLarge {
        /// Longest series declared in the header.
        m_max: usize,
        /// Longest series actually stored.
        longest: usize,
    },
    /// The elevation cosines are not sorted in ascending order.
    #[error("elevation cosines are not sorted in ascending order at index {index}")]
    UnsortedMu {
        /// First index whose value is smaller than its predecessor.
        index: usize,
    },
}

/// Features of the format that are rejected rather than approximated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedFeature {
    /// The file does not contain a BSDF.
    #[error("flags {0:#x} do not declare a BSDF")]
    MissingBsdf(u32),
    /// The file uses harmonic extrapolation.
    #[error("harmonic extrapolation is not supported")]
    HarmonicExtrapolation,
    /// The flags contain bits with no known meaning.
    #[error("unknown flags {0:#x}")]
    UnknownFlags(u32),
    /// Only monochromatic and RGB tables are supported.
    #[error("unsupported channel count {0}, expected 1 or 3")]
    ChannelCount(i32),
    /// Textured materials (more than one basis function) are not supported.
    #[error("texturing is not supported, file has {0} basis functions")]
    Texturing(i32),
}
