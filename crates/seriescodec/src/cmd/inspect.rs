use std::fs;

use seriescodec_codec::{Header, HEADER_SIZE};
use serde::Serialize;

use crate::cmd::InspectArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_json, print_pretty, print_table, OutputFormat};

#[derive(Serialize)]
struct InspectOutput {
    offset: usize,
    input_bytes: usize,
    flags_byte: u8,
    flags: Vec<&'static str>,
    seq_num: u32,
    shared_length: bool,
    shared_time_range: bool,
    shared_alignment: bool,
    per_channel_keys: bool,
    per_channel_time_range: bool,
    per_channel_alignment: bool,
    body_bytes: usize,
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(&args)?;
    let header =
        Header::peek(&input, args.offset).map_err(|err| codec_error("inspect failed", err))?;
    let flags = header.flags;

    let out = InspectOutput {
        offset: args.offset,
        input_bytes: input.len(),
        flags_byte: flags.bits(),
        flags: flags.names(),
        seq_num: header.seq_num,
        shared_length: flags.equal_lengths(),
        shared_time_range: flags.shared_time_range(),
        shared_alignment: flags.shared_alignment(),
        per_channel_keys: !flags.all_channels_present(),
        per_channel_time_range: flags.per_channel_time_range(),
        per_channel_alignment: flags.per_channel_alignment(),
        body_bytes: input.len() - args.offset - HEADER_SIZE,
    };

    let rows = vec![
        ("seq_num", out.seq_num.to_string()),
        ("flags", format!("{:#04x} ({})", out.flags_byte, flags)),
        ("shared sections", describe_shared(&out)),
        ("per-channel sections", describe_per_channel(&out)),
        ("body bytes", out.body_bytes.to_string()),
    ];
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Pretty => print_pretty("Frame header", &rows),
    }
    Ok(SUCCESS)
}

fn read_input(args: &InspectArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.hex {
        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        return hex::decode(cleaned)
            .map_err(|err| CliError::new(USAGE, format!("--hex is not valid hex: {err}")));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "one of --hex or --file is required"))
}

fn describe_shared(out: &InspectOutput) -> String {
    let mut parts = Vec::new();
    if out.shared_length {
        parts.push("length");
    }
    if out.shared_time_range {
        parts.push("time range");
    }
    if out.shared_alignment {
        parts.push("alignment");
    }
    join_or_none(&parts)
}

fn describe_per_channel(out: &InspectOutput) -> String {
    let mut parts = Vec::new();
    if out.per_channel_keys {
        parts.push("key");
    }
    if !out.shared_length {
        parts.push("length");
    }
    parts.push("data");
    if out.per_channel_time_range {
        parts.push("time range");
    }
    if out.per_channel_alignment {
        parts.push("alignment");
    }
    join_or_none(&parts)
}

fn join_or_none(parts: &[&str]) -> String {
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for_hex(hex: &str) -> InspectArgs {
        InspectArgs {
            hex: Some(hex.to_string()),
            file: None,
            offset: 0,
        }
    }

    #[test]
    fn hex_input_ignores_whitespace() {
        let bytes = read_input(&args_for_hex("3f 01 00\n00 00")).unwrap();
        assert_eq!(bytes, vec![0x3f, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn invalid_hex_is_usage_error() {
        let err = read_input(&args_for_hex("zz")).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn short_input_is_data_error() {
        let err = run(args_for_hex("3f01"), OutputFormat::Json).unwrap_err();
        assert_eq!(err.code, crate::exit::DATA_INVALID);
    }
}
