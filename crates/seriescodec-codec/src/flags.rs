//! The leading flags byte and the fixed message header.

use std::fmt;

use crate::error::{CodecError, Result};

/// Header: flags (1) + sequence number (4) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Bit positions inside the flags byte (bit 0 = LSB).
pub const ALL_CHANNELS_PRESENT: u8 = 0;
pub const TIME_RANGES_ZERO: u8 = 1;
pub const EQUAL_TIME_RANGES: u8 = 2;
pub const EQUAL_LENGTHS: u8 = 3;
pub const EQUAL_ALIGNMENTS: u8 = 4;
pub const ZERO_ALIGNMENTS: u8 = 5;

const KNOWN_BITS: u8 = 0b0011_1111;

const NAMES: [(u8, &str); 6] = [
    (ALL_CHANNELS_PRESENT, "all_channels_present"),
    (TIME_RANGES_ZERO, "time_ranges_zero"),
    (EQUAL_TIME_RANGES, "eq_tr"),
    (EQUAL_LENGTHS, "eq_len"),
    (EQUAL_ALIGNMENTS, "eq_align"),
    (ZERO_ALIGNMENTS, "zero_alignments"),
];

/// Selects which optional sections of a message are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    /// Parse a flags byte. Unknown high bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & KNOWN_BITS)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn get(self, bit: u8) -> bool {
        self.0 & (1 << bit) != 0
    }

    pub fn set(&mut self, bit: u8, value: bool) {
        if value {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }

    /// Every schema channel is in the message, so per-channel keys are omitted.
    pub const fn all_channels_present(self) -> bool {
        self.get(ALL_CHANNELS_PRESENT)
    }

    /// Time ranges are shared and zero, so no time range is written at all.
    pub const fn time_ranges_zero(self) -> bool {
        self.get(TIME_RANGES_ZERO)
    }

    pub const fn equal_time_ranges(self) -> bool {
        self.get(EQUAL_TIME_RANGES)
    }

    pub const fn equal_lengths(self) -> bool {
        self.get(EQUAL_LENGTHS)
    }

    pub const fn equal_alignments(self) -> bool {
        self.get(EQUAL_ALIGNMENTS)
    }

    /// Alignments are shared and zero, so no alignment is written at all.
    pub const fn zero_alignments(self) -> bool {
        self.get(ZERO_ALIGNMENTS)
    }

    /// A single time range follows the header.
    pub const fn shared_time_range(self) -> bool {
        self.equal_time_ranges() && !self.time_ranges_zero()
    }

    /// Each channel carries its own time range.
    pub const fn per_channel_time_range(self) -> bool {
        !self.equal_time_ranges() && !self.time_ranges_zero()
    }

    /// A single alignment follows the header.
    pub const fn shared_alignment(self) -> bool {
        self.equal_alignments() && !self.zero_alignments()
    }

    /// Each channel carries its own alignment.
    pub const fn per_channel_alignment(self) -> bool {
        !self.equal_alignments() && !self.zero_alignments()
    }

    /// Names of the set flags, lowest bit first.
    pub fn names(self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(bit, _)| self.get(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = self.names();
        if set.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&set.join("|"))
        }
    }
}

/// The fixed part of every encoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub flags: Flags,
    pub seq_num: u32,
}

impl Header {
    /// Read the header at `offset` without consulting any schema.
    pub fn peek(src: &[u8], offset: usize) -> Result<Self> {
        let available = src.len().saturating_sub(offset);
        if available < HEADER_SIZE {
            return Err(CodecError::MalformedFrame {
                offset,
                needed: HEADER_SIZE,
                available,
            });
        }
        let flags = Flags::from_bits(src[offset]);
        let mut seq = [0u8; 4];
        seq.copy_from_slice(&src[offset + 1..offset + HEADER_SIZE]);
        Ok(Self {
            flags,
            seq_num: u32::from_le_bytes(seq),
        })
    }

    pub fn flag_names(&self) -> Vec<&'static str> {
        self.flags.names()
    }
}
