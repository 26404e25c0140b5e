//! Schema-versioned compact binary codec for multi-channel telemetry frames.
//!
//! Every message is laid out as:
//! - A 1-byte flags field selecting which optional sections follow
//! - A 4-byte little-endian schema sequence number
//! - Optional shared length, time range and alignment sections
//! - Per-channel key, length, data, time range and alignment, as flagged
//!
//! Encoder and decoder each hold their own [`Codec`]. Schema updates on either
//! side bump a sequence number; the decoder keeps older schemas until a frame
//! stamped with a newer one arrives.

pub mod codec;
pub mod config;
pub mod error;
pub mod flags;
pub mod state;
mod wire;

pub use codec::Codec;
pub use config::{CodecConfig, DEFAULT_MAX_MESSAGE_SIZE};
pub use error::{CodecError, Result, ValidationError};
pub use flags::{Flags, Header, HEADER_SIZE};
pub use state::CodecState;
