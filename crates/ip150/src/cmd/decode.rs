use ip150_frame::parse_packet;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;
    let packet = parse_packet(&bytes).map_err(|err| frame_error("decode failed", err))?;

    if bytes.len() > packet.wire_size() {
        tracing::warn!(
            trailing = bytes.len() - packet.wire_size(),
            "ignoring bytes after first packet"
        );
    }

    print_packet(&packet, format);
    Ok(SUCCESS)
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let compact = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);

    hex::decode(compact).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex: {err}")))
}
