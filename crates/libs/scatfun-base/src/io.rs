//! Byte order aware reading and writing of 32-bit words.
//!
//! Every multi-byte field of the binary formats handled by scatfun is a
//! 32-bit word stored in one byte order for the whole file. Decoding is
//! parameterised by the declared byte order of the source and never depends
//! on the byte order of the host.

use crate::Float;
use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    io::{Read, Write},
};

/// Size of a word in bytes.
pub const WORD_SIZE: usize = 4;

/// Number of words decoded per chunk when reading a section.
///
/// Sections are read chunk by chunk so that the memory held never exceeds
/// what the source actually delivered by more than one chunk.
const CHUNK_WORDS: usize = 16 * 1024;

/// Byte order of the words of a file.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Least significant byte first.
    #[default]
    #[cfg_attr(feature = "cli", value(alias = "le"))]
    Little,
    /// Most significant byte first.
    #[cfg_attr(feature = "cli", value(alias = "be"))]
    Big,
}

impl Display for Endianness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little-endian"),
            Endianness::Big => write!(f, "big-endian"),
        }
    }
}

impl Endianness {
    /// Byte order of the running host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::Little;
    /// Byte order of the running host.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::Big;

    /// Returns the opposite byte order.
    pub const fn swapped(self) -> Self {
        match self {
            Endianness::Little => Endianness::Big,
            Endianness::Big => Endianness::Little,
        }
    }

    /// Reads an unsigned 32-bit word.
    pub fn read_u32<R: Read>(self, reader: &mut R) -> std::io::Result<u32> {
        match self {
            Endianness::Little => reader.read_u32::<LittleEndian>(),
            Endianness::Big => reader.read_u32::<BigEndian>(),
        }
    }

    /// Reads a signed 32-bit word.
    pub fn read_i32<R: Read>(self, reader: &mut R) -> std::io::Result<i32> {
        match self {
            Endianness::Little => reader.read_i32::<LittleEndian>(),
            Endianness::Big => reader.read_i32::<BigEndian>(),
        }
    }

    /// Reads a 32-bit floating point word.
    pub fn read_f32<R: Read>(self, reader: &mut R) -> std::io::Result<f32> {
        match self {
            Endianness::Little => reader.read_f32::<LittleEndian>(),
            Endianness::Big => reader.read_f32::<BigEndian>(),
        }
    }

    /// Writes an unsigned 32-bit word.
    pub fn write_u32<W: Write>(self, writer: &mut W, val: u32) -> std::io::Result<()> {
        match self {
            Endianness::Little => writer.write_u32::<LittleEndian>(val),
            Endianness::Big => writer.write_u32::<BigEndian>(val),
        }
    }

    /// Writes a signed 32-bit word.
    pub fn write_i32<W: Write>(self, writer: &mut W, val: i32) -> std::io::Result<()> {
        match self {
            Endianness::Little => writer.write_i32::<LittleEndian>(val),
            Endianness::Big => writer.write_i32::<BigEndian>(val),
        }
    }

    /// Writes a 32-bit floating point word.
    pub fn write_f32<W: Write>(self, writer: &mut W, val: f32) -> std::io::Result<()> {
        match self {
            Endianness::Little => writer.write_f32::<LittleEndian>(val),
            Endianness::Big => writer.write_f32::<BigEndian>(val),
        }
    }

    /// Decodes `dst.len()` signed words from `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != dst.len() * 4`.
    pub fn decode_i32s(self, src: &[u8], dst: &mut [i32]) {
        match self {
            Endianness::Little => LittleEndian::read_i32_into(src, dst),
            Endianness::Big => BigEndian::read_i32_into(src, dst),
        }
    }

    /// Decodes `dst.len()` floating point words from `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != dst.len() * 4`.
    pub fn decode_f32s(self, src: &[u8], dst: &mut [f32]) {
        match self {
            Endianness::Little => LittleEndian::read_f32_into(src, dst),
            Endianness::Big => BigEndian::read_f32_into(src, dst),
        }
    }

    /// Encodes signed words into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst.len() != src.len() * 4`.
    pub fn encode_i32s(self, src: &[i32], dst: &mut [u8]) {
        match self {
            Endianness::Little => LittleEndian::write_i32_into(src, dst),
            Endianness::Big => BigEndian::write_i32_into(src, dst),
        }
    }

    /// Encodes floating point words into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst.len() != src.len() * 4`.
    pub fn encode_f32s(self, src: &[f32], dst: &mut [u8]) {
        match self {
            Endianness::Little => LittleEndian::write_f32_into(src, dst),
            Endianness::Big => BigEndian::write_f32_into(src, dst),
        }
    }
}

/// Error while reading a section of consecutive words.
#[derive(Debug, thiserror::Error)]
pub enum ReadWordsError {
    /// The source ended before the section did.
    #[error("expected {expected} bytes, only {available} available")]
    Truncated {
        /// Size of the section in bytes.
        expected: u64,
        /// Number of bytes the source delivered.
        available: u64,
    },
    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reads `count` words and decodes them chunk by chunk with `decode`.
fn read_words<R, T, D>(reader: &mut R, count: usize, decode: D) -> Result<Vec<T>, ReadWordsError>
where
    R: Read,
    T: Copy + Default,
    D: Fn(&[u8], &mut [T]),
{
    let expected = count as u64 * WORD_SIZE as u64;
    let mut words = Vec::with_capacity(count.min(CHUNK_WORDS));
    let mut bytes = Vec::with_capacity(count.min(CHUNK_WORDS) * WORD_SIZE);
    let mut decoded = vec![T::default(); count.min(CHUNK_WORDS)];
    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(CHUNK_WORDS);
        bytes.clear();
        reader
            .by_ref()
            .take((n * WORD_SIZE) as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() < n * WORD_SIZE {
            let available = (words.len() * WORD_SIZE + bytes.len()) as u64;
            return Err(ReadWordsError::Truncated {
                expected,
                available,
            });
        }
        decode(&bytes, &mut decoded[..n]);
        words.extend_from_slice(&decoded[..n]);
        remaining -= n;
    }
    Ok(words)
}

/// Reads `count` signed 32-bit words stored in the given byte order.
pub fn read_i32s<R: Read>(
    reader: &mut R,
    count: usize,
    order: Endianness,
) -> Result<Vec<i32>, ReadWordsError> {
    read_words(reader, count, |src, dst| order.decode_i32s(src, dst))
}

/// Reads `count` 32-bit floating point words stored in the given byte order
/// and converts them to the working precision.
///
/// The conversion is value-preserving: with `Float = f64` each value is
/// widened, never reinterpreted.
pub fn read_floats<R: Read>(
    reader: &mut R,
    count: usize,
    order: Endianness,
) -> Result<Vec<Float>, ReadWordsError> {
    let words = read_words(reader, count, |src, dst| order.decode_f32s(src, dst))?;
    Ok(words.into_iter().map(Float::from).collect())
}

/// Writes signed 32-bit words in the given byte order.
pub fn write_i32s<W: Write>(writer: &mut W, src: &[i32], order: Endianness) -> std::io::Result<()> {
    let mut buf = vec![0u8; std::mem::size_of_val(src)];
    order.encode_i32s(src, &mut buf);
    writer.write_all(&buf)
}

/// Writes real numbers as 32-bit floating point words in the given byte
/// order.
#[allow(clippy::unnecessary_cast)]
pub fn write_floats<W: Write>(
    writer: &mut W,
    src: &[Float],
    order: Endianness,
) -> std::io::Result<()> {
    let narrowed = src.iter().map(|&v| v as f32).collect::<Vec<_>>();
    let mut buf = vec![0u8; narrowed.len() * WORD_SIZE];
    order.encode_f32s(&narrowed, &mut buf);
    writer.write_all(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn decode_single_words() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(
            Endianness::Little.read_u32(&mut &bytes[..]).unwrap(),
            0x0403_0201
        );
        assert_eq!(
            Endianness::Big.read_u32(&mut &bytes[..]).unwrap(),
            0x0102_0304
        );
        let one = 1.0f32.to_be_bytes();
        assert_eq!(Endianness::Big.read_f32(&mut &one[..]).unwrap(), 1.0);
    }

    #[test]
    fn swapped_and_native() {
        assert_eq!(Endianness::Little.swapped(), Endianness::Big);
        assert_eq!(Endianness::Big.swapped(), Endianness::Little);
        #[cfg(target_endian = "little")]
        assert_eq!(Endianness::NATIVE, Endianness::Little);
    }

    #[test]
    fn truncated_section_reports_available_bytes() {
        let mut bytes = Vec::new();
        write_i32s(&mut bytes, &[1, 2, 3], Endianness::Little).unwrap();
        bytes.push(0xff);
        let err = read_i32s(&mut Cursor::new(bytes), 5, Endianness::Little).unwrap_err();
        match err {
            ReadWordsError::Truncated {
                expected,
                available,
            } => {
                assert_eq!(expected, 20);
                assert_eq!(available, 13);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sections_larger_than_a_chunk() {
        let count = CHUNK_WORDS * 2 + 7;
        let src = (0..count as i32).collect::<Vec<_>>();
        let mut bytes = Vec::new();
        write_i32s(&mut bytes, &src, Endianness::Big).unwrap();
        let read = read_i32s(&mut Cursor::new(bytes), count, Endianness::Big).unwrap();
        assert_eq!(read, src);
    }

    #[test]
    fn empty_section() {
        let read = read_floats(&mut Cursor::new(Vec::new()), 0, Endianness::Little).unwrap();
        assert!(read.is_empty());
    }

    proptest! {
        #[test]
        fn floats_are_bit_exact_in_both_orders(
            vals in proptest::collection::vec(any::<f32>().prop_filter("finite", |v| v.is_finite()), 0..64),
            big in any::<bool>(),
        ) {
            let order = if big { Endianness::Big } else { Endianness::Little };
            let src = vals.iter().map(|&v| Float::from(v)).collect::<Vec<_>>();
            let mut bytes = Vec::new();
            write_floats(&mut bytes, &src, order).unwrap();
            prop_assert_eq!(bytes.len(), vals.len() * WORD_SIZE);
            let read = read_floats(&mut Cursor::new(bytes), vals.len(), order).unwrap();
            for (a, b) in read.iter().zip(vals.iter()) {
                prop_assert_eq!(Float::from(*b).to_bits(), a.to_bits());
            }
        }

        #[test]
        fn opposite_order_is_byte_reversed(val in any::<i32>()) {
            let mut le = Vec::new();
            let mut be = Vec::new();
            Endianness::Little.write_i32(&mut le, val).unwrap();
            Endianness::Big.write_i32(&mut be, val).unwrap();
            be.reverse();
            prop_assert_eq!(le, be);
        }
    }
}
