use clap::{Args, Subcommand, ValueEnum};
use ip150_frame::{HeaderCommand, HeaderMessageType};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod build;
pub mod decode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an EPROM memory read request.
    EpromRead(MemoryReadArgs),
    /// Build a RAM memory read request.
    RamRead(MemoryReadArgs),
    /// Build a partition command.
    Partition(PartitionArgs),
    /// Decode a hex-encoded packet.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::EpromRead(args) => build::eprom_read(args, format),
        Command::RamRead(args) => build::ram_read(args, format),
        Command::Partition(args) => build::partition(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Header fields shared by every built packet.
#[derive(Args, Debug)]
pub struct HeaderArgs {
    /// Header command opcode.
    #[arg(long, value_enum, default_value = "serial-passthrough")]
    pub header_command: HeaderCommandArg,
    /// Header message type.
    #[arg(long, value_enum, default_value = "serial-passthru-request")]
    pub message_type: MessageTypeArg,
    /// Header sub-command byte.
    #[arg(long, default_value = "0", value_parser = parse_u8)]
    pub sub_command: u8,
}

#[derive(Args, Debug)]
pub struct MemoryReadArgs {
    /// Start address (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_u32)]
    pub address: u32,
    /// Number of bytes to read (1-64).
    #[arg(long)]
    pub length: u8,
    #[command(flatten)]
    pub header: HeaderArgs,
}

#[derive(Args, Debug)]
pub struct PartitionArgs {
    /// Partition number, starting at 1.
    #[arg(long)]
    pub partition: u8,
    /// Command name (ARM, STAY_ARM, INSTANT_ARM, FORCE_ARM, DISARM, BEEP).
    #[arg(long)]
    pub command: String,
    #[command(flatten)]
    pub header: HeaderArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Packet bytes as hex; whitespace and ':' separators are ignored.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HeaderCommandArg {
    SerialPassthrough,
    Connect,
    LoginStep1,
    LoginStep2,
    Unknown,
    SerialConnectionInitiated,
    MultiCommand,
    Disconnect,
}

impl From<HeaderCommandArg> for HeaderCommand {
    fn from(arg: HeaderCommandArg) -> Self {
        match arg {
            HeaderCommandArg::SerialPassthrough => HeaderCommand::SerialPassthrough,
            HeaderCommandArg::Connect => HeaderCommand::ConnectToModule,
            HeaderCommandArg::LoginStep1 => HeaderCommand::LoginStep1,
            HeaderCommandArg::LoginStep2 => HeaderCommand::LoginStep2,
            HeaderCommandArg::Unknown => HeaderCommand::Unknown,
            HeaderCommandArg::SerialConnectionInitiated => {
                HeaderCommand::SerialConnectionInitiated
            }
            HeaderCommandArg::MultiCommand => HeaderCommand::MultiCommand,
            HeaderCommandArg::Disconnect => HeaderCommand::Disconnect,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageTypeArg {
    IpRequest,
    IpResponse,
    SerialPassthruRequest,
    SerialPassthruResponse,
}

impl From<MessageTypeArg> for HeaderMessageType {
    fn from(arg: MessageTypeArg) -> Self {
        match arg {
            MessageTypeArg::IpRequest => HeaderMessageType::IpRequest,
            MessageTypeArg::IpResponse => HeaderMessageType::IpResponse,
            MessageTypeArg::SerialPassthruRequest => HeaderMessageType::SerialPassthruRequest,
            MessageTypeArg::SerialPassthruResponse => HeaderMessageType::SerialPassthruResponse,
        }
    }
}

fn parse_u32(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|err| format!("invalid number '{input}': {err}"))
}

fn parse_u8(input: &str) -> Result<u8, String> {
    let value = parse_u32(input)?;
    u8::try_from(value).map_err(|_| format!("value {value} does not fit in a byte"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_u32_hex_and_decimal() {
        assert_eq!(parse_u32("0x00F0"), Ok(0xF0));
        assert_eq!(parse_u32("0X10000"), Ok(0x1_0000));
        assert_eq!(parse_u32("240"), Ok(240));
    }

    #[test]
    fn parse_u32_rejects_garbage() {
        assert!(parse_u32("0xZZ").is_err());
        assert!(parse_u32("").is_err());
    }

    #[test]
    fn parse_u8_rejects_wide_values() {
        assert_eq!(parse_u8("0xFF"), Ok(0xFF));
        assert!(parse_u8("256").is_err());
    }

    #[test]
    fn command_arg_maps_to_opcode() {
        assert_eq!(HeaderCommand::from(HeaderCommandArg::Connect).opcode(), 0xF0);
        assert_eq!(
            HeaderCommand::from(HeaderCommandArg::Disconnect).opcode(),
            0xFF
        );
    }
}
