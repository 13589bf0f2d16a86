/// Errors that can occur while building or parsing IP150 packets.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A memory read was requested with a length outside `1..=64`.
    #[error("invalid memory request length {length} (expected 1..=64)")]
    InvalidMemoryRequest { length: u8 },

    /// A partition command targets a partition the command field cannot hold.
    #[error("invalid partition {partition} (expected 1..=8)")]
    InvalidPartition { partition: u8 },

    /// The payload does not fit the 16-bit header length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The header does not start with the `0xAA` sentinel.
    #[error("invalid start of header 0x{0:02X} (expected 0xAA)")]
    InvalidStartOfHeader(u8),

    /// The header carries a message type outside the known set.
    #[error("unknown message type 0x{0:02X}")]
    UnknownMessageType(u8),

    /// The header carries an encryption flag outside the known set.
    #[error("unknown encryption flag 0x{0:02X}")]
    UnknownEncryptionFlag(u8),

    /// A buffer ended before a complete header or packet.
    #[error("truncated buffer ({available} bytes, need {needed})")]
    Truncated { needed: usize, available: usize },

    /// An I/O error occurred while reading or writing packets.
    #[error("packet I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete packet was received.
    #[error("connection closed (incomplete packet)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
