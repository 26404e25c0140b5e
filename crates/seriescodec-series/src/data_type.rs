//! Sample data types.
//!
//! Fixed-width types carry their byte width ("density"). Variable-width types
//! store `\n`-terminated samples whose count cannot be derived from the byte
//! length alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// Byte width of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Density {
    /// Every sample occupies exactly this many bytes.
    Fixed(usize),
    /// Samples have no fixed width and must be delimited explicitly.
    Variable,
}

/// Supported sample data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Nanoseconds since the Unix epoch, stored as a little-endian i64.
    Timestamp,
    /// Raw 16-byte UUID.
    Uuid,
    Float64,
    Float32,
    Int64,
    Int32,
    Int16,
    Int8,
    Uint64,
    Uint32,
    Uint16,
    Uint8,
    /// `\n`-terminated UTF-8 strings.
    String,
    /// `\n`-terminated JSON documents.
    Json,
}

impl DataType {
    /// Every supported data type, fixed-width first.
    pub const ALL: [DataType; 14] = [
        DataType::Timestamp,
        DataType::Uuid,
        DataType::Float64,
        DataType::Float32,
        DataType::Int64,
        DataType::Int32,
        DataType::Int16,
        DataType::Int8,
        DataType::Uint64,
        DataType::Uint32,
        DataType::Uint16,
        DataType::Uint8,
        DataType::String,
        DataType::Json,
    ];

    /// Returns the byte width of one sample of this type.
    pub const fn density(self) -> Density {
        match self {
            DataType::Uuid => Density::Fixed(16),
            DataType::Timestamp | DataType::Float64 | DataType::Int64 | DataType::Uint64 => {
                Density::Fixed(8)
            }
            DataType::Float32 | DataType::Int32 | DataType::Uint32 => Density::Fixed(4),
            DataType::Int16 | DataType::Uint16 => Density::Fixed(2),
            DataType::Int8 | DataType::Uint8 => Density::Fixed(1),
            DataType::String | DataType::Json => Density::Variable,
        }
    }

    /// Fixed sample width in bytes, or `None` for variable-width types.
    pub const fn fixed_width(self) -> Option<usize> {
        match self.density() {
            Density::Fixed(width) => Some(width),
            Density::Variable => None,
        }
    }

    /// Returns true if samples of this type have no fixed width.
    pub const fn is_variable(self) -> bool {
        matches!(self.density(), Density::Variable)
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            DataType::Timestamp => "timestamp",
            DataType::Uuid => "uuid",
            DataType::Float64 => "float64",
            DataType::Float32 => "float32",
            DataType::Int64 => "int64",
            DataType::Int32 => "int32",
            DataType::Int16 => "int16",
            DataType::Int8 => "int8",
            DataType::Uint64 => "uint64",
            DataType::Uint32 => "uint32",
            DataType::Uint16 => "uint16",
            DataType::Uint8 => "uint8",
            DataType::String => "string",
            DataType::Json => "json",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DataType::ALL
            .into_iter()
            .find(|dt| dt.name() == lowered)
            .ok_or_else(|| SeriesError::UnknownDataType(s.to_string()))
    }
}
