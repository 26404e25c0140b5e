use seriescodec_series::{ChannelKey, DataType, SeriesError};

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Encode or decode was attempted before the first schema update.
    #[error("codec has no schema (call update first)")]
    UninitializedCodec,

    /// The frame does not match the current schema.
    #[error("frame rejected by schema: {0}")]
    Validation(#[from] ValidationError),

    /// The buffer ended before a field could be read.
    #[error("malformed frame: needed {needed} bytes at offset {offset}, {available} available")]
    MalformedFrame {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// An encoded message or a declared channel payload exceeds the configured maximum.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// A decoded channel payload could not be turned into a series.
    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
}

/// Reasons a frame cannot be encoded against the current schema.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The channel is not part of the current schema.
    #[error("channel {0} is not in the current schema")]
    UnknownChannel(ChannelKey),

    /// The series data type differs from the one the schema declares.
    #[error("channel {key} expects {expected} data but series holds {actual}")]
    DataTypeMismatch {
        key: ChannelKey,
        expected: DataType,
        actual: DataType,
    },

    /// The channel appears more than once in the frame.
    #[error("channel {0} appears more than once in the frame")]
    DuplicateChannel(ChannelKey),

    /// The series length does not fit the 4-byte length field.
    #[error("channel {key} length {len} exceeds the u32 length field")]
    SeriesTooLarge { key: ChannelKey, len: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
