//! Partition arm/disarm commands.
//!
//! One command nibble per partition, two partitions per byte:
//!
//! ```text
//! ┌──────┬──────┬──────────┬────────────────┬──────────┬──────────┐
//! │ 0x40 │ 0x0F │ 0x00 x4  │ Message (4B)   │ 0x00 x4  │ Checksum │
//! └──────┴──────┴──────────┴────────────────┴──────────┴──────────┘
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{FrameError, Result};
use crate::packet::Payload;

/// Serialized size of a command payload, checksum byte included.
pub const COMMAND_PAYLOAD_SIZE: usize = 15;

/// Start-of-message marker for partition commands.
pub const COMMAND_START: u8 = 0x40;

/// Payload-size byte carried right after the start marker.
pub const COMMAND_PAYLOAD_SIZE_BYTE: u8 = 0x0F;

/// Offset of the nibble-packed message bytes.
pub const MESSAGE_BYTES_OFFSET: usize = 6;

/// Width of the nibble-packed message field.
pub const MESSAGE_BYTES_LEN: usize = 4;

/// Highest partition number the message field can address.
pub const MAX_PARTITION: u8 = (MESSAGE_BYTES_LEN * 2) as u8;

/// Command sent to a single partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PartitionCommandKind {
    /// Sentinel for unrecognised input; never sent to a panel.
    #[default]
    Unknown = 0,
    Arm = 2,
    StayArm = 3,
    InstantArm = 4,
    ForceArm = 5,
    Disarm = 6,
    Beep = 8,
}

impl PartitionCommandKind {
    pub const ALL: [PartitionCommandKind; 7] = [
        PartitionCommandKind::Unknown,
        PartitionCommandKind::Arm,
        PartitionCommandKind::StayArm,
        PartitionCommandKind::InstantArm,
        PartitionCommandKind::ForceArm,
        PartitionCommandKind::Disarm,
        PartitionCommandKind::Beep,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            PartitionCommandKind::Unknown => "UNKNOWN",
            PartitionCommandKind::Arm => "ARM",
            PartitionCommandKind::StayArm => "STAY_ARM",
            PartitionCommandKind::InstantArm => "INSTANT_ARM",
            PartitionCommandKind::ForceArm => "FORCE_ARM",
            PartitionCommandKind::Disarm => "DISARM",
            PartitionCommandKind::Beep => "BEEP",
        }
    }

    /// Parse a command name, falling back to [`PartitionCommandKind::Unknown`].
    ///
    /// Matching ignores case and surrounding whitespace, and accepts `-` in
    /// place of `_`.
    pub fn parse_lenient(input: &str) -> Self {
        let normalized = input.trim().to_ascii_uppercase().replace('-', "_");
        match Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized)
        {
            Some(kind) => kind,
            None => {
                tracing::warn!(command = input, "unrecognised partition command");
                PartitionCommandKind::Unknown
            }
        }
    }
}

impl FromStr for PartitionCommandKind {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl TryFrom<u8> for PartitionCommandKind {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.value() == value)
            .ok_or(value)
    }
}

impl fmt::Display for PartitionCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A command for one partition, encoded into the shared 4-byte message field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionCommand {
    partition: u8,
    command: PartitionCommandKind,
}

impl PartitionCommand {
    /// Create a command for a 1-based partition number.
    pub fn new(partition: u8, command: PartitionCommandKind) -> Result<Self> {
        if partition == 0 || partition > MAX_PARTITION {
            return Err(FrameError::InvalidPartition { partition });
        }
        Ok(Self { partition, command })
    }

    pub fn partition(&self) -> u8 {
        self.partition
    }

    pub fn command(&self) -> PartitionCommandKind {
        self.command
    }

    /// The nibble-packed message field with only this partition set.
    pub fn message_bytes(&self) -> [u8; MESSAGE_BYTES_LEN] {
        let mut bytes = [0u8; MESSAGE_BYTES_LEN];
        let slot = usize::from(self.partition - 1);
        let value = self.command.value();
        bytes[slot / 2] = if slot % 2 == 0 {
            value << 4
        } else {
            value & 0x0F
        };
        bytes
    }

    /// Serialize the command with a zeroed checksum placeholder.
    pub fn serialize(&self) -> [u8; COMMAND_PAYLOAD_SIZE] {
        let mut buf = [0u8; COMMAND_PAYLOAD_SIZE];
        buf[0] = COMMAND_START;
        buf[1] = COMMAND_PAYLOAD_SIZE_BYTE;
        buf[MESSAGE_BYTES_OFFSET..MESSAGE_BYTES_OFFSET + MESSAGE_BYTES_LEN]
            .copy_from_slice(&self.message_bytes());
        buf
    }
}

impl Payload for PartitionCommand {
    fn to_payload_bytes(&self) -> Vec<u8> {
        self.serialize().to_vec()
    }

    fn checksummed(&self) -> bool {
        true
    }
}
