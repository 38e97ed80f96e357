//! # scatfun-bsdf
//! Tabulated, isotropic Fourier BSDFs stored in the `SCATFUN` binary format
//! produced by layered-material designers.
//!
//! [`FourierBsdfTable::load`] reads and validates a file in a single pass and
//! returns either a complete table or a [`LoadError`] naming the file and the
//! violated constraint. The table is immutable afterwards and can be shared
//! by any number of evaluation threads.
#![warn(missing_docs)]

pub mod error;
pub mod header;
mod material;
mod table;

pub use error::{FormatError, LoadError, LoadErrorKind, Section, UnsupportedFeature};
pub use header::{Channels, Header, Layout};
pub use material::FourierMaterial;
pub use table::{FourierBsdfTable, FourierSeries};

pub use base::{Endianness, Float};
