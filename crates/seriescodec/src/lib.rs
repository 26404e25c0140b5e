//! Compact schema-versioned wire codec for multi-channel telemetry frames.
//!
//! seriescodec encodes batches of time-stamped samples from many channels into
//! a single binary message, using a flags byte to omit sections that are
//! uniform across the batch (lengths, time ranges, alignments, channel keys).
//!
//! # Crate Structure
//!
//! - [`series`]: Data model: data types, series, frames
//! - [`codec`]: Schema-versioned encoder/decoder
//!
//! ```
//! use seriescodec::codec::Codec;
//! use seriescodec::series::{DataType, Frame, Series};
//!
//! let encoder = Codec::with_schema(&[1, 2], &[DataType::Uint8, DataType::Float32]);
//! let mut decoder = Codec::with_schema(&[1, 2], &[DataType::Uint8, DataType::Float32]);
//!
//! let mut frame = Frame::new();
//! frame.push(2, Series::from_values(&[4.0f32, 5.0, 6.0]));
//! frame.push(1, Series::from_values(&[1u8, 2, 3]));
//!
//! let wire = encoder.encode(&frame).unwrap();
//! let decoded = decoder.decode(&wire).unwrap();
//! assert_eq!(decoded.get(1).unwrap().to_values::<u8>().unwrap(), vec![1, 2, 3]);
//! ```

/// Re-export data model types.
pub mod series {
    pub use seriescodec_series::*;
}

/// Re-export codec types.
pub mod codec {
    pub use seriescodec_codec::*;
}
