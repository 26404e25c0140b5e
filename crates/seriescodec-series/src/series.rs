use bytes::{BufMut, Bytes, BytesMut};

use crate::data_type::{DataType, Density};
use crate::error::{Result, SeriesError};
use crate::sample::Sample;
use crate::time_range::TimeRange;

/// Terminator appended after every variable-width sample.
pub const SAMPLE_DELIMITER: u8 = b'\n';

/// One channel's samples over an optional time range.
///
/// Immutable once built; the `with_*` methods return a modified copy that
/// shares the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    data_type: DataType,
    data: Bytes,
    time_range: TimeRange,
    alignment: u64,
}

impl Series {
    /// Create a series from a pre-encoded little-endian buffer.
    ///
    /// Fixed-width types require a whole number of samples.
    pub fn new(data_type: DataType, data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        if let Density::Fixed(width) = data_type.density() {
            if data.len() % width != 0 {
                return Err(SeriesError::UnalignedData {
                    data_type,
                    len: data.len(),
                });
            }
        }
        Ok(Self {
            data_type,
            data,
            time_range: TimeRange::ZERO,
            alignment: 0,
        })
    }

    /// An empty series of the given type.
    pub fn empty(data_type: DataType) -> Self {
        Self {
            data_type,
            data: Bytes::new(),
            time_range: TimeRange::ZERO,
            alignment: 0,
        }
    }

    /// Build a series from a homogeneous slice of primitives.
    pub fn from_values<T: Sample>(values: &[T]) -> Self {
        let width = T::DATA_TYPE.fixed_width().unwrap_or(0);
        let mut buf = BytesMut::with_capacity(values.len() * width);
        for &value in values {
            T::put(value, &mut buf);
        }
        Self {
            data_type: T::DATA_TYPE,
            data: buf.freeze(),
            time_range: TimeRange::ZERO,
            alignment: 0,
        }
    }

    /// Build a single-sample series.
    pub fn from_value<T: Sample>(value: T) -> Self {
        Self::from_values(&[value])
    }

    /// Build a timestamp series from nanosecond values.
    pub fn from_timestamps(values: &[i64]) -> Self {
        Self {
            data_type: DataType::Timestamp,
            ..Self::from_values(values)
        }
    }

    /// Build a UUID series from raw 16-byte identifiers.
    pub fn from_uuids(values: &[[u8; 16]]) -> Self {
        Self::from_values(values)
    }

    /// Build a string series; every sample is written followed by `\n`.
    ///
    /// Samples must not themselves contain `\n`.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = BytesMut::new();
        for value in values {
            buf.put_slice(value.as_ref().as_bytes());
            buf.put_u8(SAMPLE_DELIMITER);
        }
        Self {
            data_type: DataType::String,
            data: buf.freeze(),
            time_range: TimeRange::ZERO,
            alignment: 0,
        }
    }

    /// Build a JSON series; every document is written compact followed by `\n`.
    pub fn from_json(values: &[serde_json::Value]) -> Result<Self> {
        let mut buf = BytesMut::new();
        for value in values {
            let encoded = serde_json::to_vec(value)?;
            buf.put_slice(&encoded);
            buf.put_u8(SAMPLE_DELIMITER);
        }
        Ok(Self {
            data_type: DataType::Json,
            data: buf.freeze(),
            time_range: TimeRange::ZERO,
            alignment: 0,
        })
    }

    /// Return a copy covering `time_range`. The range is not validated.
    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Return a copy carrying `alignment`.
    pub fn with_alignment(mut self, alignment: u64) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    /// Length as the wire codec sees it.
    ///
    /// Sample count for fixed-width types, raw byte length for variable-width
    /// types. Use [`Series::sample_count`] for the logical number of samples.
    pub fn len(&self) -> usize {
        match self.data_type.density() {
            Density::Fixed(width) => self.data.len() / width,
            Density::Variable => self.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Number of logical samples, counting `\n` terminators for variable-width types.
    pub fn sample_count(&self) -> usize {
        match self.data_type.density() {
            Density::Fixed(width) => self.data.len() / width,
            Density::Variable => self
                .data
                .iter()
                .filter(|&&b| b == SAMPLE_DELIMITER)
                .count(),
        }
    }

    /// Read the samples back as a vector of primitives.
    pub fn to_values<T: Sample>(&self) -> Result<Vec<T>> {
        if !T::accepts(self.data_type) {
            return Err(SeriesError::TypeMismatch {
                expected: T::DATA_TYPE,
                actual: self.data_type,
            });
        }
        let width = T::DATA_TYPE.fixed_width().unwrap_or(1);
        let mut out = Vec::with_capacity(self.data.len() / width);
        for mut chunk in self.data.chunks_exact(width) {
            out.push(T::get(&mut chunk));
        }
        Ok(out)
    }

    /// Split a string series into its samples.
    pub fn strings(&self) -> Result<Vec<&str>> {
        self.expect_type(DataType::String)?;
        self.variable_samples()
            .map(|raw| std::str::from_utf8(raw).map_err(|_| SeriesError::InvalidUtf8))
            .collect()
    }

    /// Parse a JSON series into its documents.
    pub fn json_values(&self) -> Result<Vec<serde_json::Value>> {
        self.expect_type(DataType::Json)?;
        self.variable_samples()
            .map(|raw| serde_json::from_slice(raw).map_err(SeriesError::from))
            .collect()
    }

    fn expect_type(&self, expected: DataType) -> Result<()> {
        if self.data_type != expected {
            return Err(SeriesError::TypeMismatch {
                expected,
                actual: self.data_type,
            });
        }
        Ok(())
    }

    fn variable_samples(&self) -> impl Iterator<Item = &[u8]> {
        let data = self.data.as_ref();
        let body = data.strip_suffix(&[SAMPLE_DELIMITER]).unwrap_or(data);
        let is_empty = data.is_empty();
        body.split(|&b| b == SAMPLE_DELIMITER)
            .filter(move |_| !is_empty)
    }
}
