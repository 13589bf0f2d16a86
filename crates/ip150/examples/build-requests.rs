//! Builds a few common requests and prints their wire bytes.
//!
//! Run with:
//!   cargo run --example build-requests

use ip150::frame::{
    HeaderCommand, HeaderTemplate, MemoryRequest, Packet, PartitionCommand, PartitionCommandKind,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let eprom = Packet::new(
        HeaderTemplate::for_command(HeaderCommand::ConnectToModule),
        &MemoryRequest::eprom(0x00F0, 16)?,
    )?;
    print_packet("eprom read 0x00F0/16", &eprom);

    let ram = Packet::new(HeaderTemplate::default(), &MemoryRequest::ram(0x0010, 32)?)?;
    print_packet("ram read 0x0010/32", &ram);

    for (partition, name) in [(1, "ARM"), (2, "disarm"), (3, "stay-arm")] {
        let kind: PartitionCommandKind = name.parse()?;
        let packet = Packet::new(
            HeaderTemplate::default(),
            &PartitionCommand::new(partition, kind)?,
        )?;
        print_packet(&format!("partition {partition} {kind}"), &packet);
    }

    Ok(())
}

fn print_packet(label: &str, packet: &Packet) {
    let hex: Vec<String> = packet
        .to_bytes()
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect();
    println!("{label:<24} {}", hex.join(" "));
}
