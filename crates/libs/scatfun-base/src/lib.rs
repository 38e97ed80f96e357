//! # scatfun-base
//! Basic types and functions shared by the scatfun crates: the working
//! precision of real numbers, byte order aware reading and writing of 32-bit
//! words, and logging setup for the binaries.
#![warn(missing_docs)]

pub mod io;

#[cfg(feature = "cli")]
pub mod cli;

cfg_if::cfg_if! {
    if #[cfg(feature = "use_f64")] {
        /// Working precision of real numbers.
        ///
        /// Values stored on disk are always 32-bit; they are widened when read.
        pub type Float = f64;
    } else {
        /// Working precision of real numbers.
        pub type Float = f32;
    }
}

pub use io::Endianness;
