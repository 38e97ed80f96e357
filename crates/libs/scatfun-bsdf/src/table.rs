use crate::{
    error::{FormatError, LoadError, LoadErrorKind, Section},
    header::{Channels, Header, Layout},
};
use base::{
    io::{read_floats, read_i32s, write_floats, write_i32s},
    Endianness, Float,
};
use static_assertions::assert_impl_all;
use std::{
    cmp::Ordering,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

/// Tabulated isotropic BSDF in a spline x Fourier directional basis.
///
/// For every pair `(i, j)` of discretised elevation cosines (`i` incoming,
/// `j` outgoing) the table stores a Fourier series in the azimuthal angle
/// difference. All series are concatenated in one coefficient buffer and
/// addressed by per-pair offsets and lengths; the per-pair matrices are
/// stored row-major, the pair `(i, j)` being at index `i * n_mu + j`.
///
/// A table only exists fully validated: every series lies inside the
/// coefficient buffer, [`m_max`](Self::m_max) is the length of the longest
/// stored series and the elevation cosines are sorted. It is never mutated
/// after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierBsdfTable {
    /// Relative index of refraction through the material.
    eta: Float,
    /// Coefficient count of the longest series.
    m_max: usize,
    /// Colour channels.
    channels: Channels,
    /// Elevation cosines, sorted from low to high.
    mu: Box<[Float]>,
    /// Cumulative distribution for importance sampling, `n_mu x n_mu`.
    cdf: Box<[Float]>,
    /// Concatenated coefficients of all series.
    a: Box<[Float]>,
    /// Start of the series of each pair inside `a`, `n_mu x n_mu`.
    a_offset: Box<[u32]>,
    /// Order of the series of each pair, `n_mu x n_mu`. For RGB tables the
    /// `m` luminance coefficients are followed by `m` red and `m` blue ones.
    m: Box<[u32]>,
    /// First coefficient of each series, zero for empty ones.
    a0: Box<[Float]>,
    /// `1 / i` for `i` in `[0, m_max)`; the entry at index 0 is zero.
    recip: Box<[Float]>,
}

assert_impl_all!(FourierBsdfTable: Send, Sync);

/// Fourier series of one pair of elevations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierSeries<'a> {
    order: usize,
    coeffs: &'a [Float],
}

impl<'a> FourierSeries<'a> {
    /// Number of coefficients per channel.
    pub fn order(&self) -> usize { self.order }

    /// Returns true if no data is stored for the pair (perfect absorption).
    pub fn is_empty(&self) -> bool { self.order == 0 }

    /// Coefficients of all channels, channel after channel.
    pub fn coeffs(&self) -> &'a [Float] { self.coeffs }

    /// Coefficients of a single channel.
    ///
    /// For RGB tables channel 0 is the luminance, 1 red and 2 blue.
    pub fn channel(&self, channel: usize) -> &'a [Float] {
        &self.coeffs[channel * self.order..(channel + 1) * self.order]
    }
}

impl FourierBsdfTable {
    /// Loads a little-endian `SCATFUN` file.
    pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self, LoadError> {
        Self::load_with_byte_order(filepath, Endianness::Little)
    }

    /// Loads a `SCATFUN` file whose words are stored in the given byte order.
    ///
    /// The file is closed before returning, whatever the outcome.
    pub fn load_with_byte_order<P: AsRef<Path>>(
        filepath: P,
        order: Endianness,
    ) -> Result<Self, LoadError> {
        let filepath = filepath.as_ref();
        let file =
            File::open(filepath).map_err(|err| LoadError::new(filepath, LoadErrorKind::Open(err)))?;
        let mut reader = BufReader::new(file);
        let table =
            Self::read_from(&mut reader, order).map_err(|kind| LoadError::new(filepath, kind))?;
        log::info!(
            "Loaded tabulated BSDF {}: {} elevations, {} coefficients, {} channel(s), eta = {}",
            filepath.display(),
            table.n_mu(),
            table.n_coeffs(),
            table.n_channels(),
            table.eta
        );
        Ok(table)
    }

    /// Reads a table from the given reader, positioned at the start of the
    /// header.
    ///
    /// Trailing metadata after the coefficients is left unread.
    pub fn read_from<R: Read>(reader: &mut R, order: Endianness) -> Result<Self, LoadErrorKind> {
        let header = Header::read(reader, order)?;
        log::debug!("Tabulated BSDF header ({}): {:?}", order, header);
        let layout = header.validate()?;
        let n_pairs = layout.n_pairs();

        let mu = read_floats(reader, layout.n_mu, order)
            .map_err(|err| LoadErrorKind::from_section(Section::Mu, err))?;
        let cdf = read_floats(reader, n_pairs, order)
            .map_err(|err| LoadErrorKind::from_section(Section::Cdf, err))?;
        let offset_and_length = read_i32s(reader, 2 * n_pairs, order)
            .map_err(|err| LoadErrorKind::from_section(Section::OffsetTable, err))?;
        let a = read_floats(reader, layout.n_coeffs, order)
            .map_err(|err| LoadErrorKind::from_section(Section::Coefficients, err))?;

        Self::assemble(
            layout,
            Float::from(header.eta),
            mu,
            cdf,
            &offset_and_length,
            a,
        )
        .map_err(LoadErrorKind::from)
    }

    /// Validates the sections read from a file and derives the per-pair
    /// data.
    fn assemble(
        layout: Layout,
        eta: Float,
        mu: Vec<Float>,
        cdf: Vec<Float>,
        offset_and_length: &[i32],
        a: Vec<Float>,
    ) -> Result<Self, FormatError> {
        let n_pairs = layout.n_pairs();
        debug_assert_eq!(mu.len(), layout.n_mu);
        debug_assert_eq!(cdf.len(), n_pairs);
        debug_assert_eq!(offset_and_length.len(), 2 * n_pairs);
        debug_assert_eq!(a.len(), layout.n_coeffs);

        if let Some(i) = mu.windows(2).position(|w| {
            !matches!(w[0].partial_cmp(&w[1]), Some(Ordering::Less | Ordering::Equal))
        }) {
            return Err(FormatError::UnsortedMu { index: i + 1 });
        }

        let n_channels = layout.channels.count();
        let mut a_offset = Vec::with_capacity(n_pairs);
        let mut m = Vec::with_capacity(n_pairs);
        let mut a0 = Vec::with_capacity(n_pairs);
        for (k, pair) in offset_and_length.chunks_exact(2).enumerate() {
            let (offset, length) = (pair[0], pair[1]);
            let (row, col) = (k / layout.n_mu, k % layout.n_mu);
            let out_of_range = FormatError::SeriesOutOfRange {
                row,
                col,
                offset,
                count: length,
                n_coeffs: layout.n_coeffs,
            };
            let (start, order) = match (u32::try_from(offset), u32::try_from(length)) {
                (Ok(start), Ok(order)) => (start, order),
                _ => return Err(out_of_range),
            };
            if order as usize > layout.m_max {
                return Err(FormatError::SeriesTooLong {
                    row,
                    col,
                    count: order as usize,
                    m_max: layout.m_max,
                });
            }
            if start as usize + order as usize * n_channels > layout.n_coeffs {
                return Err(out_of_range);
            }
            a_offset.push(start);
            m.push(order);
            a0.push(if order > 0 { a[start as usize] } else { 0.0 });
        }

        // `recip` is sized by m_max, which must be backed by a stored series.
        let longest = m.iter().copied().max().unwrap_or(0) as usize;
        if layout.m_max > longest {
            return Err(FormatError::MaxOrderTooLarge {
                m_max: layout.m_max,
                longest,
            });
        }

        let recip = (0..layout.m_max)
            .map(|i| if i == 0 { 0.0 } else { 1.0 / i as Float })
            .collect::<Box<[_]>>();

        Ok(Self {
            eta,
            m_max: layout.m_max,
            channels: layout.channels,
            mu: mu.into_boxed_slice(),
            cdf: cdf.into_boxed_slice(),
            a: a.into_boxed_slice(),
            a_offset: a_offset.into_boxed_slice(),
            m: m.into_boxed_slice(),
            a0: a0.into_boxed_slice(),
            recip,
        })
    }

    /// Writes the table as a `SCATFUN` file in the given byte order.
    ///
    /// No metadata is written; roughness and reserved header words are zero.
    #[allow(clippy::unnecessary_cast)]
    pub fn write_to<W: Write>(&self, writer: &mut W, order: Endianness) -> std::io::Result<()> {
        let header = Header::new(
            self.n_mu() as i32,
            self.n_coeffs() as i32,
            self.m_max as i32,
            self.channels,
            self.eta as f32,
        );
        header.write(writer, order)?;
        write_floats(writer, &self.mu, order)?;
        write_floats(writer, &self.cdf, order)?;
        let offset_and_length = self
            .a_offset
            .iter()
            .zip(self.m.iter())
            .flat_map(|(&offset, &length)| [offset as i32, length as i32])
            .collect::<Vec<_>>();
        write_i32s(writer, &offset_and_length, order)?;
        write_floats(writer, &self.a, order)
    }

    /// Saves the table to a file in the given byte order.
    pub fn save<P: AsRef<Path>>(&self, filepath: P, order: Endianness) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(filepath.as_ref())?);
        self.write_to(&mut writer, order)?;
        writer.flush()?;
        log::info!(
            "Saved tabulated BSDF to {} ({})",
            filepath.as_ref().display(),
            order
        );
        Ok(())
    }

    /// Relative index of refraction through the material.
    pub fn eta(&self) -> Float { self.eta }

    /// Coefficient count of the longest series.
    pub fn m_max(&self) -> usize { self.m_max }

    /// Colour channels of the table.
    pub fn channels(&self) -> Channels { self.channels }

    /// Number of colour channels, 1 or 3.
    pub fn n_channels(&self) -> usize { self.channels.count() }

    /// Number of elevation samples.
    pub fn n_mu(&self) -> usize { self.mu.len() }

    /// Number of pairs of elevations.
    pub fn n_pairs(&self) -> usize { self.m.len() }

    /// Number of stored coefficients.
    pub fn n_coeffs(&self) -> usize { self.a.len() }

    /// Elevation cosines, sorted from low to high.
    pub fn mu(&self) -> &[Float] { &self.mu }

    /// Cumulative distribution of all pairs, row-major.
    pub fn cdf(&self) -> &[Float] { &self.cdf }

    /// Cumulative distribution over the outgoing elevations for the incoming
    /// elevation `row`.
    pub fn cdf_row(&self, row: usize) -> &[Float] {
        let n_mu = self.n_mu();
        &self.cdf[row * n_mu..(row + 1) * n_mu]
    }

    /// Concatenated coefficients of all series.
    pub fn a(&self) -> &[Float] { &self.a }

    /// Offsets of the series of all pairs into [`a`](Self::a), row-major.
    pub fn a_offset(&self) -> &[u32] { &self.a_offset }

    /// Orders of the series of all pairs, row-major.
    pub fn m(&self) -> &[u32] { &self.m }

    /// First coefficient of the series of all pairs, row-major.
    pub fn a0(&self) -> &[Float] { &self.a0 }

    /// First coefficient of the series of the pair `(row, col)`, zero if the
    /// pair stores no data.
    pub fn a0_at(&self, row: usize, col: usize) -> Float { self.a0[self.pair_index(row, col)] }

    /// Reciprocals `1 / i` for `i` in `[0, m_max)`.
    ///
    /// Index 0 holds zero and is not meant to be read.
    pub fn recip(&self) -> &[Float] { &self.recip }

    /// Fourier series of the pair `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is not smaller than [`n_mu`](Self::n_mu).
    pub fn series(&self, row: usize, col: usize) -> FourierSeries<'_> {
        let k = self.pair_index(row, col);
        let order = self.m[k] as usize;
        let start = self.a_offset[k] as usize;
        FourierSeries {
            order,
            coeffs: &self.a[start..start + order * self.n_channels()],
        }
    }

    /// Index of the first elevation cosine not smaller than `cos_theta`;
    /// `n_mu` if all are smaller.
    pub fn find_mu(&self, cos_theta: Float) -> usize { self.mu.partition_point(|&mu| mu < cos_theta) }

    #[track_caller]
    fn pair_index(&self, row: usize, col: usize) -> usize {
        let n_mu = self.n_mu();
        assert!(
            row < n_mu && col < n_mu,
            "pair ({row}, {col}) out of range for {n_mu} elevations"
        );
        row * n_mu + col
    }
}
