//! Packet framing and payload encoding for the Paradox IP150 module.
//!
//! Every packet on the wire is:
//! - A 16-byte header: `0xAA` sentinel, little-endian payload length,
//!   message type, encryption flag, command opcode and reserved bytes
//! - A payload, whose last byte is a byte-sum checksum for memory reads and
//!   partition commands
//!
//! The codec only builds and interprets buffers. Encryption is delegated to an
//! [`EncryptionEnvelope`] supplied by the session layer.

pub mod checksum;
pub mod command;
pub mod envelope;
pub mod error;
pub mod header;
pub mod memory;
pub mod packet;
pub mod reader;
pub mod response;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use command::{PartitionCommand, PartitionCommandKind, MAX_PARTITION};
pub use envelope::EncryptionEnvelope;
pub use error::{FrameError, Result};
pub use header::{
    EncryptionFlag, HeaderCommand, HeaderMessageType, HeaderTemplate, PacketHeader, HEADER_SIZE,
};
pub use memory::{MemoryRequest, Region, MAX_READ_LENGTH, MIN_READ_LENGTH};
pub use packet::{decode_packet, parse_packet, CodecConfig, Packet, Payload, MAX_PAYLOAD_SIZE};
pub use reader::PacketReader;
pub use response::is_disconnect_acknowledged;
pub use writer::PacketWriter;

#[cfg(feature = "async")]
pub use async_codec::PacketCodec;
