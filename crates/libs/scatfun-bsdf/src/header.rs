//! Header of a `SCATFUN` file.
//!
//! The header is 64 bytes long: an 8-byte identifier (`SCATFUN` followed by
//! the version byte) and fourteen 32-bit words.
//!
//! | Offset | Field                | Type     |
//! |--------|----------------------|----------|
//! | 0      | identifier + version | 8 bytes  |
//! | 8      | flags                | u32      |
//! | 12     | n_mu                 | i32      |
//! | 16     | n_coeffs             | i32      |
//! | 20     | m_max                | i32      |
//! | 24     | n_channels           | i32      |
//! | 28     | n_bases              | i32      |
//! | 32     | n_metadata_bytes     | i32      |
//! | 36     | n_parameters         | i32      |
//! | 40     | n_parameter_values   | i32      |
//! | 44     | eta                  | f32      |
//! | 48     | alpha                | 2 x f32  |
//! | 56     | unused               | 2 x f32  |

use crate::error::{FormatError, LoadErrorKind, Section, UnsupportedFeature};
use base::{io::WORD_SIZE, Endianness};
use static_assertions::const_assert_eq;
use std::io::{Read, Write};

/// Identifier at the start of every file.
pub const IDENTIFIER: &[u8; 7] = b"SCATFUN";

/// The only supported version of the format.
pub const VERSION: u8 = 1;

/// Number of 32-bit words following the identifier.
const HEADER_WORDS: usize = 14;

/// Size of the header in bytes, identifier included.
pub const HEADER_SIZE: usize = IDENTIFIER.len() + 1 + HEADER_WORDS * WORD_SIZE;

const_assert_eq!(HEADER_SIZE, 64);

/// Bits of the `flags` header field.
pub mod flags {
    /// The file contains a BSDF.
    pub const BSDF: u32 = 0x01;
    /// The file uses harmonic extrapolation.
    pub const HARMONIC_EXTRAPOLATION: u32 = 0x02;
}

/// Number of colour channels of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channels {
    /// Monochromatic table.
    Mono = 1,
    /// RGB table; each series stores luminance, red then blue coefficients.
    Rgb = 3,
}

impl Channels {
    /// Returns the number of channels.
    pub const fn count(self) -> usize { self as usize }

    /// Converts the channel count stored in a file.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::Mono),
            3 => Some(Self::Rgb),
            _ => None,
        }
    }
}

/// Header of a `SCATFUN` file, exactly as stored on disk.
///
/// The words are kept as read so that inspecting tools can show rejected
/// files; [`Header::validate`] turns them into a [`Layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    /// Bit field, see [`flags`].
    pub flags: u32,
    /// Number of samples of the elevational discretisation.
    pub n_mu: i32,
    /// Total number of Fourier coefficients stored in the file.
    pub n_coeffs: i32,
    /// Coefficient count of the longest series in the file.
    pub m_max: i32,
    /// Number of colour channels.
    pub n_channels: i32,
    /// Number of basis functions (more than one means a textured material).
    pub n_bases: i32,
    /// Size of the descriptive metadata following the BSDF data.
    pub n_metadata_bytes: i32,
    /// Number of textured material parameters.
    pub n_parameters: i32,
    /// Total number of samples of all textured parameters.
    pub n_parameter_values: i32,
    /// Relative index of refraction through the material.
    pub eta: f32,
    /// Beckmann-equivalent roughness of the top and bottom sides.
    pub alpha: [f32; 2],
}

/// Validated sizes of a table, derived from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Number of elevation samples; at least one.
    pub n_mu: usize,
    /// Number of stored coefficients.
    pub n_coeffs: usize,
    /// Coefficient count of the longest series.
    pub m_max: usize,
    /// Colour channels.
    pub channels: Channels,
}

impl Layout {
    /// Number of pairs of elevations, `n_mu * n_mu`.
    pub const fn n_pairs(&self) -> usize { self.n_mu * self.n_mu }
}

impl Header {
    /// Creates the header of a monochromatic or RGB table with uniform
    /// material properties.
    pub fn new(n_mu: i32, n_coeffs: i32, m_max: i32, channels: Channels, eta: f32) -> Self {
        Self {
            flags: flags::BSDF,
            n_mu,
            n_coeffs,
            m_max,
            n_channels: channels.count() as i32,
            n_bases: 1,
            n_metadata_bytes: 0,
            n_parameters: 0,
            n_parameter_values: 0,
            eta,
            alpha: [0.0; 2],
        }
    }

    /// Reads the header from the given reader, which must be positioned at
    /// the start of the file.
    ///
    /// Only the identifier and version are checked here.
    pub fn read<R: Read>(reader: &mut R, order: Endianness) -> Result<Self, LoadErrorKind> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        reader
            .by_ref()
            .take(HEADER_SIZE as u64)
            .read_to_end(&mut buf)?;

        let n = buf.len().min(IDENTIFIER.len());
        if buf[..n] != IDENTIFIER[..n] {
            return Err(FormatError::InvalidMagic.into());
        }
        if let Some(&version) = buf.get(IDENTIFIER.len()) {
            if version != VERSION {
                return Err(FormatError::UnsupportedVersion(version).into());
            }
        }
        if buf.len() < HEADER_SIZE {
            return Err(FormatError::Truncated {
                section: Section::Header,
                expected: HEADER_SIZE as u64,
                available: buf.len() as u64,
            }
            .into());
        }

        let words = &mut &buf[IDENTIFIER.len() + 1..];
        let flags = order.read_u32(words)?;
        let n_mu = order.read_i32(words)?;
        let n_coeffs = order.read_i32(words)?;
        let m_max = order.read_i32(words)?;
        let n_channels = order.read_i32(words)?;
        let n_bases = order.read_i32(words)?;
        let n_metadata_bytes = order.read_i32(words)?;
        let n_parameters = order.read_i32(words)?;
        let n_parameter_values = order.read_i32(words)?;
        let eta = order.read_f32(words)?;
        let alpha = [order.read_f32(words)?, order.read_f32(words)?];
        debug_assert_eq!(words.len(), 2 * WORD_SIZE);

        Ok(Self {
            flags,
            n_mu,
            n_coeffs,
            m_max,
            n_channels,
            n_bases,
            n_metadata_bytes,
            n_parameters,
            n_parameter_values,
            eta,
            alpha,
        })
    }

    /// Writes the header, whether it is valid or not.
    pub fn write<W: Write>(&self, writer: &mut W, order: Endianness) -> std::io::Result<()> {
        writer.write_all(IDENTIFIER)?;
        writer.write_all(&[VERSION])?;
        order.write_u32(writer, self.flags)?;
        for word in [
            self.n_mu,
            self.n_coeffs,
            self.m_max,
            self.n_channels,
            self.n_bases,
            self.n_metadata_bytes,
            self.n_parameters,
            self.n_parameter_values,
        ] {
            order.write_i32(writer, word)?;
        }
        for word in [self.eta, self.alpha[0], self.alpha[1], 0.0, 0.0] {
            order.write_f32(writer, word)?;
        }
        Ok(())
    }

    /// Checks that the header describes a table this loader supports and
    /// returns its sizes.
    ///
    /// Only uniform (non-textured) monochromatic or RGB BSDFs without
    /// harmonic extrapolation are accepted.
    pub fn validate(&self) -> Result<Layout, LoadErrorKind> {
        if self.flags & flags::HARMONIC_EXTRAPOLATION != 0 {
            return Err(UnsupportedFeature::HarmonicExtrapolation.into());
        }
        if self.flags & flags::BSDF == 0 {
            return Err(UnsupportedFeature::MissingBsdf(self.flags).into());
        }
        if self.flags != flags::BSDF {
            return Err(UnsupportedFeature::UnknownFlags(self.flags).into());
        }
        let channels = Channels::from_raw(self.n_channels)
            .ok_or(UnsupportedFeature::ChannelCount(self.n_channels))?;
        if self.n_bases != 1 {
            return Err(UnsupportedFeature::Texturing(self.n_bases).into());
        }

        let n_mu = count("n_mu", self.n_mu)?;
        if n_mu == 0 {
            return Err(invalid_count("n_mu", self.n_mu).into());
        }
        // Every pair takes two words in the offset table.
        let offset_table_size = n_mu
            .checked_mul(n_mu)
            .and_then(|n| n.checked_mul(2 * WORD_SIZE));
        if offset_table_size.is_none() {
            return Err(invalid_count("n_mu", self.n_mu).into());
        }

        Ok(Layout {
            n_mu,
            n_coeffs: count("n_coeffs", self.n_coeffs)?,
            m_max: count("m_max", self.m_max)?,
            channels,
        })
    }
}

fn invalid_count(field: &'static str, value: i32) -> FormatError {
    FormatError::InvalidCount {
        field,
        value: value as i64,
    }
}

fn count(field: &'static str, value: i32) -> Result<usize, FormatError> {
    usize::try_from(value).map_err(|_| invalid_count(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(header: &Header, order: Endianness) -> Vec<u8> {
        let mut buf = Vec::new();
        header.write(&mut buf, order).unwrap();
        buf
    }

    #[test]
    fn header_is_64_bytes() {
        let header = Header::new(2, 3, 4, Channels::Mono, 1.5);
        assert_eq!(encode(&header, Endianness::Little).len(), HEADER_SIZE);
    }

    #[test]
    fn field_offsets() {
        let mut header = Header::new(7, 11, 5, Channels::Rgb, 1.33);
        header.n_metadata_bytes = 42;
        header.alpha = [0.25, 0.5];
        let buf = encode(&header, Endianness::Little);
        assert_eq!(&buf[..8], b"SCATFUN\x01");
        assert_eq!(&buf[8..12], &1u32.to_le_bytes());
        assert_eq!(&buf[12..16], &7i32.to_le_bytes());
        assert_eq!(&buf[16..20], &11i32.to_le_bytes());
        assert_eq!(&buf[20..24], &5i32.to_le_bytes());
        assert_eq!(&buf[24..28], &3i32.to_le_bytes());
        assert_eq!(&buf[28..32], &1i32.to_le_bytes());
        assert_eq!(&buf[32..36], &42i32.to_le_bytes());
        assert_eq!(&buf[44..48], &1.33f32.to_le_bytes());
        assert_eq!(&buf[48..52], &0.25f32.to_le_bytes());
        assert_eq!(&buf[60..64], &[0u8; 4]);
    }

    #[test]
    fn read_in_both_byte_orders() {
        let header = Header::new(16, 1024, 33, Channels::Rgb, 1.5);
        for order in [Endianness::Little, Endianness::Big] {
            let buf = encode(&header, order);
            let read = Header::read(&mut Cursor::new(buf), order).unwrap();
            assert_eq!(read, header);
        }
    }

    #[test]
    fn reject_wrong_magic() {
        let mut buf = encode(&Header::new(1, 1, 1, Channels::Mono, 1.0), Endianness::Little);
        buf[0] = b'X';
        let err = Header::read(&mut Cursor::new(buf), Endianness::Little).unwrap_err();
        assert!(matches!(err, LoadErrorKind::Format(FormatError::InvalidMagic)));

        let err = Header::read(&mut Cursor::new(b"PNG".to_vec()), Endianness::Little).unwrap_err();
        assert!(matches!(err, LoadErrorKind::Format(FormatError::InvalidMagic)));
    }

    #[test]
    fn reject_wrong_version() {
        let mut buf = encode(&Header::new(1, 1, 1, Channels::Mono, 1.0), Endianness::Little);
        buf[7] = 2;
        let err = Header::read(&mut Cursor::new(buf), Endianness::Little).unwrap_err();
        assert!(matches!(
            err,
            LoadErrorKind::Format(FormatError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn reject_short_header() {
        let buf = encode(&Header::new(1, 1, 1, Channels::Mono, 1.0), Endianness::Little);
        for len in [0, 5, 8, 40, 63] {
            let err =
                Header::read(&mut Cursor::new(buf[..len].to_vec()), Endianness::Little).unwrap_err();
            match err {
                LoadErrorKind::Format(FormatError::Truncated {
                    section,
                    expected,
                    available,
                }) => {
                    assert_eq!(section, Section::Header);
                    assert_eq!(expected, 64);
                    assert_eq!(available, len as u64);
                },
                other => panic!("unexpected error for length {len}: {other}"),
            }
        }
    }

    #[test]
    fn validate_accepts_uniform_tables() {
        let layout = Header::new(2, 3, 4, Channels::Mono, 1.0).validate().unwrap();
        assert_eq!(
            layout,
            Layout {
                n_mu: 2,
                n_coeffs: 3,
                m_max: 4,
                channels: Channels::Mono
            }
        );
        assert_eq!(layout.n_pairs(), 4);
        let layout = Header::new(1, 0, 0, Channels::Rgb, 1.0).validate().unwrap();
        assert_eq!(layout.channels.count(), 3);
    }

    #[test]
    fn validate_rejects_unsupported_features() {
        let base = Header::new(2, 3, 4, Channels::Mono, 1.0);
        let cases = [
            (
                Header { flags: 0x03, ..base },
                UnsupportedFeature::HarmonicExtrapolation,
            ),
            (Header { flags: 0x00, ..base }, UnsupportedFeature::MissingBsdf(0)),
            (Header { flags: 0x05, ..base }, UnsupportedFeature::UnknownFlags(5)),
            (
                Header {
                    n_channels: 2,
                    ..base
                },
                UnsupportedFeature::ChannelCount(2),
            ),
            (Header { n_bases: 2, ..base }, UnsupportedFeature::Texturing(2)),
            (Header { n_bases: 0, ..base }, UnsupportedFeature::Texturing(0)),
        ];
        for (header, expected) in cases {
            match header.validate() {
                Err(LoadErrorKind::Unsupported(feature)) => assert_eq!(feature, expected),
                other => panic!("unexpected result for {header:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn validate_rejects_invalid_counts() {
        let base = Header::new(2, 3, 4, Channels::Mono, 1.0);
        for (header, field) in [
            (Header { n_mu: 0, ..base }, "n_mu"),
            (Header { n_mu: -1, ..base }, "n_mu"),
            (
                Header {
                    n_coeffs: -3,
                    ..base
                },
                "n_coeffs",
            ),
            (Header { m_max: -4, ..base }, "m_max"),
        ] {
            match header.validate() {
                Err(LoadErrorKind::Format(FormatError::InvalidCount { field: f, .. })) => {
                    assert_eq!(f, field)
                },
                other => panic!("unexpected result for {header:?}: {other:?}"),
            }
        }
    }
}
