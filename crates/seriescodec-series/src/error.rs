use crate::data_type::DataType;

/// Errors that can occur while building or reading series and frames.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// The buffer length is not a whole number of fixed-width samples.
    #[error("{len} bytes is not a whole number of {data_type} samples")]
    UnalignedData { data_type: DataType, len: usize },

    /// The series holds a different data type than the one requested.
    #[error("data type mismatch (expected {expected}, got {actual})")]
    TypeMismatch {
        expected: DataType,
        actual: DataType,
    },

    /// A time range whose start lies after its end.
    #[error("time range start {start} is after end {end}")]
    InvertedTimeRange { start: i64, end: i64 },

    /// Keys and series passed to a frame have different lengths.
    #[error("frame has {keys} keys but {series} series")]
    LengthMismatch { keys: usize, series: usize },

    /// A data type name that does not match any known type.
    #[error("unknown data type: {0}")]
    UnknownDataType(String),

    /// A variable-width sample could not be read as UTF-8.
    #[error("sample is not valid UTF-8")]
    InvalidUtf8,

    /// A sample could not be (de)serialized as JSON.
    #[error("sample is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SeriesError>;
