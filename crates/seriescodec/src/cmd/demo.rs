use seriescodec_codec::{Codec, Header};
use seriescodec_series::{ChannelKey, DataType, Frame, Series, TimeRange};
use serde::Serialize;

use crate::cmd::DemoArgs;
use crate::exit::{codec_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_json, print_pretty, print_table, OutputFormat};

const SAMPLE_PERIOD_NS: i64 = 1_000_000;

#[derive(Serialize)]
struct DemoOutput {
    channels: u32,
    channels_sent: usize,
    samples: usize,
    seq_num: u32,
    flags: Vec<&'static str>,
    raw_bytes: usize,
    encoded_bytes: usize,
    overhead_bytes: usize,
    decoded_channels: usize,
    round_trip_ok: bool,
}

pub fn run(args: DemoArgs, format: OutputFormat) -> CliResult<i32> {
    if args.channels == 0 {
        return Err(CliError::new(USAGE, "--channels must be greater than zero"));
    }

    let keys: Vec<ChannelKey> = (1..=args.channels).collect();
    let data_types = vec![DataType::Float64; keys.len()];
    let encoder = Codec::with_schema(&keys, &data_types);
    let mut decoder = Codec::with_schema(&keys, &data_types);

    let frame = synthetic_frame(&keys, args.samples, args.partial);
    let wire = encoder
        .encode(&frame)
        .map_err(|err| codec_error("encode failed", err))?;
    let decoded = decoder
        .decode(&wire)
        .map_err(|err| codec_error("decode failed", err))?;
    let header = Header::peek(&wire, 0).map_err(|err| codec_error("decode failed", err))?;

    let raw_bytes: usize = frame.series().iter().map(Series::byte_len).sum();
    let round_trip_ok = decoded.len() == frame.len()
        && frame.iter().all(|(key, series)| decoded.get(key) == Some(series));
    tracing::debug!(
        encoded = wire.len(),
        raw = raw_bytes,
        round_trip_ok,
        "demo frame encoded"
    );

    let out = DemoOutput {
        channels: args.channels,
        channels_sent: frame.len(),
        samples: args.samples,
        seq_num: header.seq_num,
        flags: header.flag_names(),
        raw_bytes,
        encoded_bytes: wire.len(),
        overhead_bytes: wire.len() - raw_bytes,
        decoded_channels: decoded.len(),
        round_trip_ok,
    };

    let rows = vec![
        ("channels sent", format!("{} of {}", out.channels_sent, out.channels)),
        ("samples", out.samples.to_string()),
        ("flags", out.flags.join("|")),
        ("raw bytes", out.raw_bytes.to_string()),
        ("encoded bytes", out.encoded_bytes.to_string()),
        ("overhead bytes", out.overhead_bytes.to_string()),
        ("round trip", if round_trip_ok { "ok" } else { "MISMATCH" }.to_string()),
    ];
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Pretty => print_pretty("Demo frame", &rows),
    }

    Ok(if round_trip_ok { SUCCESS } else { FAILURE })
}

/// One sine wave per channel over a shared time range.
fn synthetic_frame(keys: &[ChannelKey], samples: usize, partial: bool) -> Frame {
    let end = SAMPLE_PERIOD_NS.saturating_mul(samples as i64);
    let time_range = TimeRange { start: 0, end };

    keys.iter()
        .enumerate()
        .filter(|(idx, _)| !partial || idx % 2 == 0)
        .map(|(idx, &key)| {
            let values: Vec<f64> = (0..samples)
                .map(|i| ((i as f64) * 0.1 + idx as f64).sin())
                .collect();
            let series = Series::from_values(&values).with_time_range(time_range);
            (key, series)
        })
        .collect()
}
