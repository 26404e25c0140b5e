#![cfg(feature = "cli")]

use std::process::Command;

fn seriescodec() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seriescodec"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn inspect_prints_header_as_json() {
    let output = seriescodec()
        .args(["--format", "json", "inspect", "--hex", "3f0200000003000000010203"])
        .output()
        .expect("inspect should run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(json["seq_num"], 2);
    assert_eq!(json["flags_byte"], 0x3f);
    assert_eq!(json["shared_length"], true);
    assert_eq!(json["per_channel_keys"], false);
    assert_eq!(json["body_bytes"], 7);
}

#[test]
fn inspect_rejects_truncated_header() {
    let output = seriescodec()
        .args(["inspect", "--hex", "3f02"])
        .output()
        .expect("inspect should run");
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed frame"));
}

#[test]
fn demo_round_trip_reports_success() {
    let output = seriescodec()
        .args([
            "--format",
            "json",
            "demo",
            "--channels",
            "4",
            "--samples",
            "32",
            "--partial",
        ])
        .output()
        .expect("demo should run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(json["round_trip_ok"], true);
    assert_eq!(json["channels_sent"], 2);
    assert_eq!(json["decoded_channels"], 2);
    assert_eq!(json["raw_bytes"], 2 * 32 * 8);
}

#[test]
fn version_prints_package_version() {
    let output = seriescodec()
        .arg("version")
        .output()
        .expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("seriescodec "));
}
