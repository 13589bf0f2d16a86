#![cfg(feature = "cli")]

use std::process::{Command, Output};

use ip150_frame::{parse_packet, HeaderCommand, PartitionCommandKind};

fn ip150(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ip150"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("ip150 should run")
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

#[test]
fn eprom_read_outputs_framed_request() {
    let output = ip150(&[
        "--format",
        "json",
        "eprom-read",
        "--address",
        "0x00F0",
        "--length",
        "16",
        "--header-command",
        "connect",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let out = json(&output);
    assert_eq!(out["wire_size"], 24);
    assert_eq!(out["command"], 0xF0);
    assert_eq!(out["payload"], "08500000F0001058");
    assert_eq!(out["checksum_valid"], true);
}

#[test]
fn raw_output_is_decodable() {
    let output = ip150(&[
        "--format",
        "raw",
        "partition",
        "--partition",
        "3",
        "--command",
        "beep",
    ]);
    assert!(output.status.success());

    let packet = parse_packet(&output.stdout).expect("raw output should be a packet");
    assert_eq!(packet.header().header_command(), Some(HeaderCommand::SerialPassthrough));
    assert_eq!(packet.payload()[7], PartitionCommandKind::Beep.value() << 4);
    assert!(packet.checksum_valid());
}

#[test]
fn decode_round_trips_built_packet() {
    let built = ip150(&["--format", "json", "ram-read", "--address", "16", "--length", "4"]);
    assert!(built.status.success());
    let wire = json(&built)["wire"].as_str().expect("wire hex").to_string();

    let decoded = ip150(&["--format", "json", "decode", &wire]);
    assert!(decoded.status.success());
    let out = json(&decoded);
    assert_eq!(out["payload"], "08508000100004EC");
    assert_eq!(out["checksum_valid"], true);
}

#[test]
fn invalid_length_exits_with_usage_code() {
    let output = ip150(&["ram-read", "--address", "0", "--length", "0"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid memory request"));
}

#[test]
fn unknown_partition_command_exits_with_usage_code() {
    let output = ip150(&["partition", "--partition", "1", "--command", "FOO"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn malformed_packet_exits_with_data_invalid() {
    let output = ip150(&["decode", "5508000408F0000001000000000000000000"]);
    assert_eq!(output.status.code(), Some(60));
}
