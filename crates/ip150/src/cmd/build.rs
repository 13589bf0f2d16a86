use ip150_frame::{
    HeaderCommand, HeaderTemplate, MemoryRequest, Packet, PartitionCommand, PartitionCommandKind,
    Region,
};

use crate::cmd::{HeaderArgs, MemoryReadArgs, PartitionArgs};
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_packet, OutputFormat};

pub fn eprom_read(args: MemoryReadArgs, format: OutputFormat) -> CliResult<i32> {
    memory_read(args, Region::Eprom, format)
}

pub fn ram_read(args: MemoryReadArgs, format: OutputFormat) -> CliResult<i32> {
    memory_read(args, Region::Ram, format)
}

pub fn partition(args: PartitionArgs, format: OutputFormat) -> CliResult<i32> {
    let kind = PartitionCommandKind::parse_lenient(&args.command);
    if kind == PartitionCommandKind::Unknown {
        return Err(CliError::new(
            USAGE,
            format!("unknown partition command '{}'", args.command),
        ));
    }

    let command = PartitionCommand::new(args.partition, kind)
        .map_err(|err| frame_error("invalid partition command", err))?;
    let packet = Packet::new(template(&args.header), &command)
        .map_err(|err| frame_error("packet build failed", err))?;

    tracing::info!(
        partition = args.partition,
        command = %kind,
        "built partition command"
    );
    print_packet(&packet, format);
    Ok(SUCCESS)
}

fn memory_read(args: MemoryReadArgs, region: Region, format: OutputFormat) -> CliResult<i32> {
    let request = MemoryRequest::new(args.address, args.length, region)
        .map_err(|err| frame_error("invalid memory request", err))?;
    let packet = Packet::new(template(&args.header), &request)
        .map_err(|err| frame_error("packet build failed", err))?;

    tracing::info!(
        ?region,
        address = args.address,
        length = args.length,
        control = request.control_byte(),
        "built memory read"
    );
    print_packet(&packet, format);
    Ok(SUCCESS)
}

fn template(args: &HeaderArgs) -> HeaderTemplate {
    HeaderTemplate {
        message_type: args.message_type.into(),
        sub_command: args.sub_command,
        ..HeaderTemplate::for_command(HeaderCommand::from(args.header_command))
    }
}
