//! Typed sample buffers and multi-channel frames.
//!
//! This is the data model the wire codec operates on:
//! - [`DataType`]: the closed set of sample types, each fixed-width or variable-width
//! - [`Series`]: one channel's samples plus time range and alignment
//! - [`Frame`]: index-aligned `(channel key, Series)` pairs exchanged as one message
//!
//! Nothing here knows about the wire format. Cross-series consistency is
//! checked by the codec at encode time.

pub mod data_type;
pub mod error;
pub mod frame;
pub mod sample;
pub mod series;
pub mod time_range;

pub use data_type::{DataType, Density};
pub use error::{Result, SeriesError};
pub use frame::{ChannelKey, Frame};
pub use sample::Sample;
pub use series::{Series, SAMPLE_DELIMITER};
pub use time_range::TimeRange;
