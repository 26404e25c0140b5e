use std::collections::BTreeMap;

use bytes::{BufMut, Bytes, BytesMut};
use seriescodec_series::{ChannelKey, DataType, Density, Frame, Series, TimeRange};
use tracing::{debug, trace, warn};

use crate::config::CodecConfig;
use crate::error::{CodecError, Result, ValidationError};
use crate::flags::{self, Flags, Header, HEADER_SIZE};
use crate::state::CodecState;
use crate::wire::WireReader;

const KEY_SIZE: usize = 4;
const LEN_SIZE: usize = 4;
const TIME_RANGE_SIZE: usize = 16;
const ALIGNMENT_SIZE: usize = 8;

/// Schema-versioned frame encoder/decoder.
///
/// Every [`update`](Codec::update) records a new [`CodecState`] under the next
/// sequence number. Encoding always uses the current state and stamps its
/// sequence number into the message; decoding looks up whichever state the
/// message was encoded against, so the two ends of a connection can apply
/// schema changes at different times.
///
/// Wire format (little-endian, `[..]` sections depend on the flags byte):
/// ```text
/// ┌───────┬─────────┬──────────────┬───────────────┬───────────────┐
/// │ Flags │ SeqNum  │ [Shared len] │ [Shared range]│ [Shared align]│
/// │ (1B)  │ (4B)    │ (4B)         │ (16B)         │ (8B)          │
/// └───────┴─────────┴──────────────┴───────────────┴───────────────┘
/// then per channel, in ascending key order:
/// ┌───────┬───────┬──────────────┬─────────┬─────────┐
/// │ [Key] │ [Len] │ Data         │ [Range] │ [Align] │
/// │ (4B)  │ (4B)  │ (variable)   │ (16B)   │ (8B)    │
/// └───────┴───────┴──────────────┴─────────┴─────────┘
/// ```
///
/// Lengths are sample counts for fixed-width types and byte lengths for
/// variable-width types.
///
/// A codec is not internally synchronized. Use one instance per direction per
/// connection, or guard a shared instance with a mutex.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    seq_num: u32,
    states: BTreeMap<u32, CodecState>,
    current: Option<u32>,
    config: CodecConfig,
}

/// A frame entry that passed validation, in wire order.
#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    key: ChannelKey,
    series: &'a Series,
    wire_len: u32,
}

impl Codec {
    /// Create a codec with no schema and default configuration.
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create a codec with no schema and explicit configuration.
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            seq_num: 0,
            states: BTreeMap::new(),
            current: None,
            config,
        }
    }

    /// Create a codec and apply one schema update.
    pub fn with_schema(keys: &[ChannelKey], data_types: &[DataType]) -> Self {
        let mut codec = Self::new();
        codec.update(keys, data_types);
        codec
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Sequence number of the most recent update (0 before the first).
    pub fn seq_num(&self) -> u32 {
        self.seq_num
    }

    /// The state new frames are encoded against.
    pub fn current_state(&self) -> Option<&CodecState> {
        self.current.and_then(|seq| self.states.get(&seq))
    }

    /// A retained historical state.
    pub fn state(&self, seq_num: u32) -> Option<&CodecState> {
        self.states.get(&seq_num)
    }

    /// Sequence numbers of every retained state, ascending.
    pub fn retained_seq_nums(&self) -> impl Iterator<Item = u32> + '_ {
        self.states.keys().copied()
    }

    /// Record a new schema and make it current.
    ///
    /// Always advances the sequence number, even if the schema is unchanged.
    /// Returns the new sequence number.
    pub fn update(&mut self, keys: &[ChannelKey], data_types: &[DataType]) -> u32 {
        if keys.len() != data_types.len() {
            warn!(
                keys = keys.len(),
                data_types = data_types.len(),
                "schema update has unpaired entries; extras ignored"
            );
        }

        self.seq_num = self.seq_num.saturating_add(1);
        let state = CodecState::from_schema(keys, data_types);
        debug!(
            seq_num = self.seq_num,
            channels = state.len(),
            variable = state.has_variable_data_types(),
            "codec schema updated"
        );
        self.states.insert(self.seq_num, state);
        self.current = Some(self.seq_num);

        if let Some(limit) = self.config.history_limit {
            self.prune_history(limit.max(1));
        }
        self.seq_num
    }

    /// Encode a frame against the current state.
    pub fn encode(&self, frame: &Frame) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        self.encode_into(frame, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Encode a frame against the current state, appending to `dst`.
    ///
    /// On error nothing is written.
    pub fn encode_into(&self, frame: &Frame, dst: &mut BytesMut) -> Result<()> {
        let (seq_num, state) = self.current()?;
        let entries = prepare(state, frame)?;
        let flags = compute_flags(state, &entries);
        self.write_message(dst, seq_num, flags, &entries)
    }

    /// Exact number of bytes [`encode`](Codec::encode) would produce.
    pub fn encoded_len(&self, frame: &Frame) -> Result<usize> {
        let (_, state) = self.current()?;
        let entries = prepare(state, frame)?;
        let flags = compute_flags(state, &entries);
        Ok(message_len(flags, &entries))
    }

    /// Decode a message starting at the beginning of `src`.
    pub fn decode(&mut self, src: &[u8]) -> Result<Frame> {
        self.decode_at(src, 0)
    }

    /// Decode a message starting at `offset` inside `src`.
    ///
    /// A message stamped with an unknown sequence number decodes to an empty
    /// frame. A known sequence number drops every older retained state.
    ///
    /// When every schema channel is present, bytes after the last channel are
    /// ignored. A partial frame writes per-channel keys and carries no total
    /// length, so the decoder reads keys until the schema or `src` runs out:
    /// `src` must end at the message boundary, or trailing bytes are read as
    /// further channels.
    pub fn decode_at(&mut self, src: &[u8], offset: usize) -> Result<Frame> {
        if self.current.is_none() {
            return Err(CodecError::UninitializedCodec);
        }

        let header = Header::peek(src, offset)?;
        if !self.states.contains_key(&header.seq_num) {
            debug!(
                seq_num = header.seq_num,
                current = self.seq_num,
                "no schema for sequence number; dropping frame"
            );
            return Ok(Frame::new());
        }

        self.collect_garbage(header.seq_num);
        let Some(state) = self.states.get(&header.seq_num) else {
            return Ok(Frame::new());
        };

        let mut reader = WireReader::new(src, offset + HEADER_SIZE);
        let frame = read_body(&mut reader, header.flags, state, self.config.max_message_size)?;
        trace!(
            seq_num = header.seq_num,
            flags = %header.flags,
            channels = frame.len(),
            bytes = reader.position() - offset,
            "decoded frame"
        );
        Ok(frame)
    }

    fn current(&self) -> Result<(u32, &CodecState)> {
        self.current
            .and_then(|seq| self.states.get(&seq).map(|state| (seq, state)))
            .ok_or(CodecError::UninitializedCodec)
    }

    fn write_message(
        &self,
        dst: &mut BytesMut,
        seq_num: u32,
        flags: Flags,
        entries: &[Entry<'_>],
    ) -> Result<()> {
        let size = message_len(flags, entries);
        if size > self.config.max_message_size {
            return Err(CodecError::MessageTooLarge {
                size,
                max: self.config.max_message_size,
            });
        }

        dst.reserve(size);
        dst.put_u8(flags.bits());
        dst.put_u32_le(seq_num);

        let first = entries.first();
        if flags.equal_lengths() {
            dst.put_u32_le(first.map_or(0, |e| e.wire_len));
        }
        if flags.shared_time_range() {
            if let Some(first) = first {
                put_time_range(dst, first.series.time_range());
            }
        }
        if flags.shared_alignment() {
            if let Some(first) = first {
                dst.put_u64_le(first.series.alignment());
            }
        }

        for entry in entries {
            if !flags.all_channels_present() {
                dst.put_u32_le(entry.key);
            }
            if !flags.equal_lengths() {
                dst.put_u32_le(entry.wire_len);
            }
            dst.put_slice(entry.series.data());
            if flags.per_channel_time_range() {
                put_time_range(dst, entry.series.time_range());
            }
            if flags.per_channel_alignment() {
                dst.put_u64_le(entry.series.alignment());
            }
        }

        trace!(seq_num, flags = %flags, channels = entries.len(), bytes = size, "encoded frame");
        Ok(())
    }

    fn collect_garbage(&mut self, seq_num: u32) {
        let retained = self.states.split_off(&seq_num);
        let dropped = self.states.len();
        self.states = retained;
        if dropped > 0 {
            debug!(seq_num, dropped, "dropped schema states older than decoded frame");
        }
    }

    fn prune_history(&mut self, limit: usize) {
        while self.states.len() > limit {
            match self.states.pop_first() {
                Some((seq_num, _)) => trace!(seq_num, limit, "dropped schema state over history limit"),
                None => break,
            }
        }
    }
}

/// Sort the frame by key and check it against `state`.
fn prepare<'a>(state: &CodecState, frame: &'a Frame) -> Result<Vec<Entry<'a>>> {
    let mut pairs: Vec<(ChannelKey, &Series)> = frame.iter().collect();
    pairs.sort_by_key(|(key, _)| *key);

    let mut entries: Vec<Entry<'a>> = Vec::with_capacity(pairs.len());
    for (key, series) in pairs {
        let expected = state
            .data_type(key)
            .ok_or(ValidationError::UnknownChannel(key))?;
        if expected != series.data_type() {
            return Err(ValidationError::DataTypeMismatch {
                key,
                expected,
                actual: series.data_type(),
            }
            .into());
        }
        if entries.last().is_some_and(|prev| prev.key == key) {
            return Err(ValidationError::DuplicateChannel(key).into());
        }
        let len = series.len();
        let wire_len =
            u32::try_from(len).map_err(|_| ValidationError::SeriesTooLarge { key, len })?;
        entries.push(Entry {
            key,
            series,
            wire_len,
        });
    }
    Ok(entries)
}

fn compute_flags(state: &CodecState, entries: &[Entry<'_>]) -> Flags {
    let mut equal_lengths = !state.has_variable_data_types();
    let mut equal_time_ranges = true;
    let mut equal_alignments = true;

    if let Some((first, rest)) = entries.split_first() {
        for entry in rest {
            equal_lengths &= entry.wire_len == first.wire_len;
            equal_time_ranges &= entry.series.time_range() == first.series.time_range();
            equal_alignments &= entry.series.alignment() == first.series.alignment();
        }
    }

    let first_range_zero = entries
        .first()
        .is_none_or(|e| e.series.time_range().is_zero());
    let first_alignment_zero = entries.first().is_none_or(|e| e.series.alignment() == 0);

    let mut out = Flags::default();
    out.set(flags::ALL_CHANNELS_PRESENT, entries.len() == state.len());
    out.set(flags::EQUAL_LENGTHS, equal_lengths);
    out.set(flags::EQUAL_TIME_RANGES, equal_time_ranges);
    out.set(flags::TIME_RANGES_ZERO, equal_time_ranges && first_range_zero);
    out.set(flags::EQUAL_ALIGNMENTS, equal_alignments);
    out.set(flags::ZERO_ALIGNMENTS, equal_alignments && first_alignment_zero);
    out
}

fn message_len(flags: Flags, entries: &[Entry<'_>]) -> usize {
    let mut size = HEADER_SIZE;
    if flags.equal_lengths() {
        size += LEN_SIZE;
    }
    if flags.shared_time_range() {
        size += TIME_RANGE_SIZE;
    }
    if flags.shared_alignment() {
        size += ALIGNMENT_SIZE;
    }

    let mut per_channel = 0;
    if !flags.all_channels_present() {
        per_channel += KEY_SIZE;
    }
    if !flags.equal_lengths() {
        per_channel += LEN_SIZE;
    }
    if flags.per_channel_time_range() {
        per_channel += TIME_RANGE_SIZE;
    }
    if flags.per_channel_alignment() {
        per_channel += ALIGNMENT_SIZE;
    }

    size + entries
        .iter()
        .map(|e| per_channel + e.series.byte_len())
        .sum::<usize>()
}

fn put_time_range(dst: &mut BytesMut, time_range: TimeRange) {
    dst.put_i64_le(time_range.start);
    dst.put_i64_le(time_range.end);
}

fn read_time_range(reader: &mut WireReader<'_>) -> Result<TimeRange> {
    let start = reader.i64()?;
    let end = reader.i64()?;
    Ok(TimeRange { start, end })
}

fn read_body(
    reader: &mut WireReader<'_>,
    flags: Flags,
    state: &CodecState,
    max_message_size: usize,
) -> Result<Frame> {
    let shared_len = if flags.equal_lengths() {
        Some(reader.u32()?)
    } else {
        None
    };
    let shared_range = if flags.shared_time_range() {
        Some(read_time_range(reader)?)
    } else {
        None
    };
    let shared_alignment = if flags.shared_alignment() {
        Some(reader.u64()?)
    } else {
        None
    };

    let mut frame = Frame::with_capacity(state.len());
    for (key, data_type) in state.iter() {
        if !flags.all_channels_present() {
            if reader.remaining() == 0 {
                break;
            }
            // A channel the frame does not carry: leave the key for the next schema entry.
            if reader.peek_u32()? != key {
                continue;
            }
            reader.u32()?;
        }

        let len = match shared_len {
            Some(len) => len,
            None => reader.u32()?,
        };
        let byte_len = payload_len(data_type, len, max_message_size)?;
        let data = Bytes::copy_from_slice(reader.take(byte_len)?);

        let time_range = match shared_range {
            Some(range) => range,
            None if flags.per_channel_time_range() => read_time_range(reader)?,
            None => TimeRange::ZERO,
        };
        let alignment = match shared_alignment {
            Some(alignment) => alignment,
            None if flags.per_channel_alignment() => reader.u64()?,
            None => 0,
        };

        let series = Series::new(data_type, data)?
            .with_time_range(time_range)
            .with_alignment(alignment);
        frame.push(key, series);
    }
    Ok(frame)
}

fn payload_len(data_type: DataType, len: u32, max: usize) -> Result<usize> {
    let len = len as usize;
    let size = match data_type.density() {
        Density::Fixed(width) => len.checked_mul(width).unwrap_or(usize::MAX),
        Density::Variable => len,
    };
    if size > max {
        return Err(CodecError::MessageTooLarge { size, max });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint8_float32_codec() -> Codec {
        Codec::with_schema(&[1, 2], &[DataType::Uint8, DataType::Float32])
    }

    fn uint8_float32_frame() -> Frame {
        let mut frame = Frame::new();
        frame.push(1, Series::from_values(&[1u8, 2, 3]));
        frame.push(2, Series::from_values(&[4.0f32, 5.0, 6.0]));
        frame
    }

    #[test]
    fn test_encode_decode_example() {
        let encoder = uint8_float32_codec();
        let mut decoder = uint8_float32_codec();

        let wire = encoder.encode(&uint8_float32_frame()).unwrap();
        let frame = decoder.decode(&wire).unwrap();

        assert_eq!(frame.keys(), &[1, 2]);
        let ch1 = frame.get(1).unwrap();
        let ch2 = frame.get(2).unwrap();
        assert_eq!(ch1.to_values::<u8>().unwrap(), vec![1, 2, 3]);
        assert_eq!(ch2.to_values::<f32>().unwrap(), vec![4.0, 5.0, 6.0]);
        assert_eq!(ch1.time_range(), TimeRange::ZERO);
        assert_eq!(ch2.time_range(), TimeRange::ZERO);
    }

    #[test]
    fn test_compact_wire_layout() {
        let wire = uint8_float32_codec()
            .encode(&uint8_float32_frame())
            .unwrap();

        // every flag set: all channels, zero ranges, equal ranges/lengths/alignments
        assert_eq!(wire[0], 0b0011_1111);
        assert_eq!(&wire[1..5], &1u32.to_le_bytes());
        assert_eq!(&wire[5..9], &3u32.to_le_bytes());
        assert_eq!(&wire[9..12], &[1, 2, 3]);
        assert_eq!(&wire[12..16], &4.0f32.to_le_bytes());
        assert_eq!(wire.len(), HEADER_SIZE + 4 + 3 + 12);
    }

    #[test]
    fn test_out_of_order_input() {
        let mut frame = Frame::new();
        frame.push(2, Series::from_values(&[4.0f32, 5.0, 6.0]));
        frame.push(1, Series::from_values(&[1u8, 2, 3]));

        let wire = uint8_float32_codec().encode(&frame).unwrap();
        let decoded = uint8_float32_codec().decode(&wire).unwrap();

        assert_eq!(decoded.get(1).unwrap().to_values::<u8>().unwrap(), vec![1, 2, 3]);
        assert_eq!(
            decoded.get(2).unwrap().to_values::<f32>().unwrap(),
            vec![4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn test_uninitialized_codec() {
        let codec = Codec::new();
        assert!(matches!(
            codec.encode(&Frame::new()),
            Err(CodecError::UninitializedCodec)
        ));

        let mut codec = Codec::new();
        assert!(matches!(
            codec.decode(&[0, 1, 0, 0, 0]),
            Err(CodecError::UninitializedCodec)
        ));
    }

    #[test]
    fn test_unknown_channel_rejected() {
        let mut frame = uint8_float32_frame();
        frame.push(3, Series::from_value(1u8));
        let err = uint8_float32_codec().encode(&frame).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Validation(ValidationError::UnknownChannel(3))
        ));
    }

    #[test]
    fn test_data_type_mismatch_rejected() {
        let mut frame = Frame::new();
        frame.push(2, Series::from_values(&[1.0f64]));
        let err = uint8_float32_codec().encode(&frame).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Validation(ValidationError::DataTypeMismatch {
                key: 2,
                expected: DataType::Float32,
                actual: DataType::Float64
            })
        ));
        assert!(err.to_string().contains("float32"));
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let mut frame = uint8_float32_frame();
        frame.push(1, Series::from_value(9u8));
        let err = uint8_float32_codec().encode(&frame).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Validation(ValidationError::DuplicateChannel(1))
        ));
    }

    #[test]
    fn test_encode_failure_writes_nothing() {
        let mut frame = Frame::new();
        frame.push(7, Series::from_value(1u8));
        let mut dst = BytesMut::from(&b"prefix"[..]);
        assert!(uint8_float32_codec().encode_into(&frame, &mut dst).is_err());
        assert_eq!(dst.as_ref(), b"prefix");
    }

    #[test]
    fn test_update_advances_sequence() {
        let mut codec = Codec::new();
        assert_eq!(codec.seq_num(), 0);
        assert!(codec.current_state().is_none());

        assert_eq!(codec.update(&[1], &[DataType::Uint8]), 1);
        assert_eq!(codec.update(&[1], &[DataType::Uint8]), 2);
        assert_eq!(codec.retained_seq_nums().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(codec.state(1), codec.state(2));
    }

    #[test]
    fn test_unknown_seq_num_yields_empty_frame() {
        let mut encoder = uint8_float32_codec();
        encoder.update(&[1, 2], &[DataType::Uint8, DataType::Float32]);
        let wire = encoder.encode(&uint8_float32_frame()).unwrap();

        let mut decoder = uint8_float32_codec();
        let frame = decoder.decode(&wire).unwrap();
        assert!(frame.is_empty());
        assert_eq!(decoder.retained_seq_nums().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_decode_older_schema_after_update() {
        let encoder = uint8_float32_codec();
        let wire = encoder.encode(&uint8_float32_frame()).unwrap();

        let mut decoder = uint8_float32_codec();
        decoder.update(&[1, 2, 3], &[DataType::Uint8, DataType::Float32, DataType::Int64]);
        assert_eq!(decoder.seq_num(), 2);

        let frame = decoder.decode(&wire).unwrap();
        assert_eq!(frame.keys(), &[1, 2]);
        assert_eq!(decoder.retained_seq_nums().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_decode_collects_older_states() {
        let mut encoder = Codec::new();
        let mut decoder = Codec::new();
        for _ in 0..3 {
            encoder.update(&[1], &[DataType::Int32]);
            decoder.update(&[1], &[DataType::Int32]);
        }
        decoder.update(&[1], &[DataType::Int32]);

        let mut frame = Frame::new();
        frame.push(1, Series::from_values(&[7i32]));
        let wire = encoder.encode(&frame).unwrap();

        decoder.decode(&wire).unwrap();
        assert_eq!(decoder.retained_seq_nums().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_partial_channels() {
        let schema = [DataType::Uint8, DataType::Int16, DataType::Float64];
        let encoder = Codec::with_schema(&[10, 20, 30], &schema);
        let mut decoder = Codec::with_schema(&[10, 20, 30], &schema);

        let mut frame = Frame::new();
        frame.push(30, Series::from_values(&[1.5f64, 2.5]));
        frame.push(10, Series::from_values(&[8u8]));

        let wire = encoder.encode(&frame).unwrap();
        assert!(!Header::peek(&wire, 0).unwrap().flags.all_channels_present());

        let decoded = decoder.decode(&wire).unwrap();
        assert_eq!(decoded.keys(), &[10, 30]);
        assert_eq!(decoded.get(10).unwrap().to_values::<u8>().unwrap(), vec![8]);
        assert_eq!(
            decoded.get(30).unwrap().to_values::<f64>().unwrap(),
            vec![1.5, 2.5]
        );
    }

    #[test]
    fn test_decoder_with_wider_schema_skips_missing_keys() {
        let encoder = Codec::with_schema(&[1, 3], &[DataType::Uint8, DataType::Uint16]);
        let mut decoder = Codec::with_schema(
            &[1, 2, 3],
            &[DataType::Uint8, DataType::Uint32, DataType::Uint16],
        );

        let mut frame = Frame::new();
        frame.push(3, Series::from_values(&[500u16, 600]));
        let wire = encoder.encode(&frame).unwrap();

        let decoded = decoder.decode(&wire).unwrap();
        assert_eq!(decoded.keys(), &[3]);
        assert_eq!(
            decoded.get(3).unwrap().to_values::<u16>().unwrap(),
            vec![500, 600]
        );
    }

    #[test]
    fn test_empty_frame() {
        let codec = uint8_float32_codec();
        let wire = codec.encode(&Frame::new()).unwrap();
        let decoded = uint8_float32_codec().decode(&wire).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_variable_width_lengths_are_bytes() {
        let encoder = Codec::with_schema(&[1, 2], &[DataType::Uint16, DataType::String]);
        let mut decoder = encoder.clone();

        let mut frame = Frame::new();
        frame.push(1, Series::from_values(&[1u16, 2, 3]));
        frame.push(2, Series::from_strings(["a", "bc"]));

        let wire = encoder.encode(&frame).unwrap();
        let header = Header::peek(&wire, 0).unwrap();
        assert!(!header.flags.equal_lengths());

        // channel 1: sample count, then 6 data bytes
        assert_eq!(&wire[5..9], &3u32.to_le_bytes());
        // channel 2: byte length of "a\nbc\n"
        assert_eq!(&wire[15..19], &5u32.to_le_bytes());
        assert_eq!(&wire[19..24], b"a\nbc\n");

        let decoded = decoder.decode(&wire).unwrap();
        assert_eq!(decoded.get(2).unwrap().strings().unwrap(), vec!["a", "bc"]);
        assert_eq!(
            decoded.get(1).unwrap().to_values::<u16>().unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_equal_lengths_forced_off_with_variable_schema() {
        let codec = Codec::with_schema(&[1, 2], &[DataType::Uint8, DataType::Json]);
        let mut frame = Frame::new();
        frame.push(1, Series::from_values(&[1u8, 2]));
        let wire = codec.encode(&frame).unwrap();
        assert!(!Header::peek(&wire, 0).unwrap().flags.equal_lengths());
    }

    #[test]
    fn test_per_channel_time_ranges_and_alignments() {
        let codec = Codec::with_schema(&[1, 2], &[DataType::Int64, DataType::Int64]);
        let tr_a = TimeRange::new(0, 100).unwrap();
        let tr_b = TimeRange::new(50, 150).unwrap();

        let mut frame = Frame::new();
        frame.push(1, Series::from_values(&[1i64]).with_time_range(tr_a).with_alignment(3));
        frame.push(2, Series::from_values(&[2i64, 3]).with_time_range(tr_b));

        let wire = codec.encode(&frame).unwrap();
        let flags = Header::peek(&wire, 0).unwrap().flags;
        assert!(flags.per_channel_time_range());
        assert!(flags.per_channel_alignment());

        let decoded = codec.clone().decode(&wire).unwrap();
        assert_eq!(decoded.get(1).unwrap().time_range(), tr_a);
        assert_eq!(decoded.get(1).unwrap().alignment(), 3);
        assert_eq!(decoded.get(2).unwrap().time_range(), tr_b);
        assert_eq!(decoded.get(2).unwrap().alignment(), 0);
    }

    #[test]
    fn test_zero_first_range_with_unequal_ranges_round_trips() {
        let codec = Codec::with_schema(&[1, 2], &[DataType::Uint8, DataType::Uint8]);
        let tr = TimeRange::new(5, 9).unwrap();

        let mut frame = Frame::new();
        frame.push(1, Series::from_value(1u8));
        frame.push(2, Series::from_value(2u8).with_time_range(tr));

        let wire = codec.encode(&frame).unwrap();
        let decoded = codec.clone().decode(&wire).unwrap();
        assert_eq!(decoded.get(1).unwrap().time_range(), TimeRange::ZERO);
        assert_eq!(decoded.get(2).unwrap().time_range(), tr);
    }

    #[test]
    fn test_shared_sections_shrink_message() {
        let codec = Codec::with_schema(&[1, 2], &[DataType::Float64, DataType::Float64]);
        let tr = TimeRange::new(1_000, 2_000).unwrap();

        let mut frame = Frame::new();
        frame.push(1, Series::from_values(&[1.0f64, 2.0]).with_time_range(tr).with_alignment(9));
        frame.push(2, Series::from_values(&[3.0f64, 4.0]).with_time_range(tr).with_alignment(9));

        let compact = codec.encode(&frame).unwrap();

        let (seq_num, state) = codec.current().unwrap();
        let entries = prepare(state, &frame).unwrap();
        let mut forced = compute_flags(state, &entries);
        assert!(forced.shared_time_range());
        assert!(forced.shared_alignment());
        forced.set(flags::EQUAL_TIME_RANGES, false);
        forced.set(flags::EQUAL_ALIGNMENTS, false);

        let mut expanded = BytesMut::new();
        codec
            .write_message(&mut expanded, seq_num, forced, &entries)
            .unwrap();
        assert!(compact.len() < expanded.len());

        let mut decoder = codec.clone();
        assert_eq!(decoder.decode(&compact).unwrap(), decoder.decode(&expanded).unwrap());
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        let codec = Codec::with_schema(&[1, 2], &[DataType::Uint8, DataType::String]);
        let mut frame = Frame::new();
        frame.push(2, Series::from_strings(["hello"]).with_alignment(4));
        let wire = codec.encode(&frame).unwrap();
        assert_eq!(codec.encoded_len(&frame).unwrap(), wire.len());
    }

    #[test]
    fn test_truncated_message_is_malformed() {
        let wire = uint8_float32_codec()
            .encode(&uint8_float32_frame())
            .unwrap();
        let mut decoder = uint8_float32_codec();

        let err = decoder.decode(&wire[..wire.len() - 1]).unwrap_err();
        assert!(matches!(err, CodecError::MalformedFrame { .. }));

        let err = decoder.decode(&wire[..3]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedFrame {
                offset: 0,
                needed: 5,
                available: 3
            }
        ));
    }

    #[test]
    fn test_decode_at_offset() {
        let mut buf = BytesMut::from(&b"xyz"[..]);
        uint8_float32_codec()
            .encode_into(&uint8_float32_frame(), &mut buf)
            .unwrap();
        buf.put_slice(b"trailing");

        let frame = uint8_float32_codec().decode_at(&buf, 3).unwrap();
        assert_eq!(frame, uint8_float32_frame());
    }

    #[test]
    fn test_partial_frame_needs_bounded_input() {
        let mut codec = Codec::with_schema(&[1, 2], &[DataType::Uint8, DataType::Uint8]);
        let mut frame = Frame::new();
        frame.push(1, Series::from_value(7u8));
        let wire = codec.encode(&frame).unwrap();
        assert!(!Header::peek(&wire, 0).unwrap().flags.all_channels_present());

        // bounded to the message: only the sent channel
        let mut buf = BytesMut::from(&wire[..]);
        buf.put_slice(&[0xAA, 0xBB]);
        assert_eq!(codec.decode(&buf[..wire.len()]).unwrap(), frame);

        // unbounded: trailing bytes are read as the next key
        let err = codec.decode(&buf).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedFrame {
                offset: 14,
                needed: 4,
                available: 2
            }
        ));

        let mut buf = BytesMut::from(&wire[..]);
        buf.put_u32_le(2);
        buf.put_u8(0x63);
        let decoded = codec.decode(&buf).unwrap();
        assert_eq!(decoded.keys(), &[1, 2]);
        assert_eq!(decoded.get(2).unwrap().to_values::<u8>().unwrap(), vec![0x63]);
    }

    #[test]
    fn test_inverted_time_range_passes_through() {
        let mut codec = Codec::with_schema(&[1, 2], &[DataType::Uint8, DataType::Uint8]);
        let inverted = TimeRange { start: 10, end: 5 };
        let mut frame = Frame::new();
        frame.push(1, Series::from_value(1u8).with_time_range(inverted));
        frame.push(2, Series::from_value(2u8).with_time_range(TimeRange::ZERO));

        let wire = codec.encode(&frame).unwrap();
        let decoded = codec.decode(&wire).unwrap();
        assert_eq!(decoded.get(1).unwrap().time_range(), inverted);
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_history_limit_keeps_current() {
        let mut codec = Codec::with_config(CodecConfig {
            history_limit: Some(2),
            ..CodecConfig::default()
        });
        for _ in 0..5 {
            codec.update(&[1], &[DataType::Uint8]);
        }
        assert_eq!(codec.retained_seq_nums().collect::<Vec<_>>(), vec![4, 5]);

        let mut codec = Codec::with_config(CodecConfig {
            history_limit: Some(0),
            ..CodecConfig::default()
        });
        codec.update(&[1], &[DataType::Uint8]);
        codec.update(&[2], &[DataType::Uint8]);
        assert_eq!(codec.retained_seq_nums().collect::<Vec<_>>(), vec![2]);
        assert_eq!(codec.current_state().unwrap().keys(), &[2]);
    }

    #[test]
    fn test_max_message_size() {
        let config = CodecConfig {
            max_message_size: 16,
            ..CodecConfig::default()
        };
        let mut codec = Codec::with_config(config);
        codec.update(&[1], &[DataType::Uint64]);

        let mut frame = Frame::new();
        frame.push(1, Series::from_values(&[1u64, 2, 3]));
        let err = codec.encode(&frame).unwrap_err();
        assert!(matches!(err, CodecError::MessageTooLarge { size: 33, max: 16 }));

        // declared length of 1000 u64 samples with no data behind it
        let mut wire = BytesMut::new();
        wire.put_u8(0b0011_1111);
        wire.put_u32_le(1);
        wire.put_u32_le(1000);
        let err = codec.decode(&wire).unwrap_err();
        assert!(matches!(err, CodecError::MessageTooLarge { size: 8000, max: 16 }));
    }
}
