//! Response-side checks on packets received from the module.

use crate::header::HeaderCommand;
use crate::packet::Packet;

/// First payload byte of a successful disconnect acknowledgement.
pub const DISCONNECT_ACK_OK: u8 = 0x01;

/// Returns true if `packet` acknowledges a disconnect request successfully.
pub fn is_disconnect_acknowledged(packet: &Packet) -> bool {
    packet.header().header_command() == Some(HeaderCommand::Disconnect)
        && packet.payload().first() == Some(&DISCONNECT_ACK_OK)
}
