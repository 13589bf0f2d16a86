use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use ip150_frame::{is_disconnect_acknowledged, HeaderCommand, Packet};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct PacketOutput {
    pub wire_size: usize,
    pub payload_length: u16,
    pub message_type: String,
    pub encrypted: bool,
    pub command: u8,
    pub command_name: &'static str,
    pub sub_command: u8,
    pub unknown0: u8,
    pub unknown1: u8,
    pub payload: String,
    pub checksum_valid: bool,
    pub disconnect_ack: bool,
    pub wire: String,
}

impl PacketOutput {
    pub fn from_packet(packet: &Packet) -> Self {
        let header = packet.header();
        Self {
            wire_size: packet.wire_size(),
            payload_length: header.payload_length,
            message_type: format!("{:?}", header.message_type),
            encrypted: header.is_encrypted(),
            command: header.command,
            command_name: command_name(header.command),
            sub_command: header.sub_command,
            unknown0: header.unknown0,
            unknown1: header.unknown1,
            payload: hex::encode_upper(packet.payload()),
            checksum_valid: packet.checksum_valid(),
            disconnect_ack: is_disconnect_acknowledged(packet),
            wire: hex::encode_upper(packet.to_bytes()),
        }
    }
}

pub fn print_packet(packet: &Packet, format: OutputFormat) {
    let out = PacketOutput::from_packet(packet);
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["length".to_string(), out.payload_length.to_string()])
                .add_row(vec!["type".to_string(), out.message_type.clone()])
                .add_row(vec!["encrypted".to_string(), out.encrypted.to_string()])
                .add_row(vec![
                    "command".to_string(),
                    format!("0x{:02X} ({})", out.command, out.command_name),
                ])
                .add_row(vec![
                    "reserved".to_string(),
                    format!(
                        "sub=0x{:02X} unk0=0x{:02X} unk1=0x{:02X}",
                        out.sub_command, out.unknown0, out.unknown1
                    ),
                ])
                .add_row(vec!["payload".to_string(), out.payload.clone()])
                .add_row(vec!["checksum".to_string(), checksum_label(&out)]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "command=0x{:02X} ({}) length={} encrypted={} checksum={} wire={}",
                out.command,
                out.command_name,
                out.payload_length,
                out.encrypted,
                checksum_label(&out),
                out.wire
            );
        }
        OutputFormat::Raw => {
            print_raw(&packet.to_bytes());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn command_name(opcode: u8) -> &'static str {
    HeaderCommand::from_opcode(opcode)
        .map(HeaderCommand::name)
        .unwrap_or("unlisted")
}

fn checksum_label(out: &PacketOutput) -> String {
    if out.encrypted {
        "n/a (encrypted)".to_string()
    } else if out.checksum_valid {
        "ok".to_string()
    } else {
        "mismatch".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ip150_frame::{HeaderTemplate, MemoryRequest};

    #[test]
    fn output_describes_eprom_request() {
        let packet = Packet::new(
            HeaderTemplate::for_command(HeaderCommand::ConnectToModule),
            &MemoryRequest::eprom(0x00F0, 16).unwrap(),
        )
        .unwrap();

        let out = PacketOutput::from_packet(&packet);
        assert_eq!(out.wire_size, 24);
        assert_eq!(out.command_name, "connect");
        assert_eq!(out.payload, "08500000F0001058");
        assert!(out.checksum_valid);
        assert!(!out.disconnect_ack);
    }

    #[test]
    fn unlisted_opcode_name() {
        assert_eq!(command_name(0x42), "unlisted");
        assert_eq!(command_name(0xFF), "disconnect");
    }
}
