//! The fixed 16-byte packet header.
//!
//! ```text
//! ┌──────┬──────────┬──────┬──────┬─────┬─────┬──────┬──────┬───────────┐
//! │ 0xAA │ Length   │ Type │ Enc  │ Cmd │ Sub │ Unk0 │ Unk1 │ 0x00 x7   │
//! │ (1B) │ (2B LE)  │ (1B) │ (1B) │(1B) │(1B) │ (1B) │ (1B) │ (padding) │
//! └──────┴──────────┴──────┴──────┴─────┴─────┴──────┴──────┴───────────┘
//! ```

use std::fmt;

use crate::error::{FrameError, Result};

/// Serialized header size.
pub const HEADER_SIZE: usize = 16;

/// Number of header bytes that carry fields; the rest is zero padding.
pub const HEADER_FIELDS_SIZE: usize = 9;

/// Header sentinel.
pub const START_OF_HEADER: u8 = 0xAA;

/// Direction and routing of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HeaderMessageType {
    IpResponse = 0x01,
    SerialPassthruResponse = 0x02,
    IpRequest = 0x03,
    SerialPassthruRequest = 0x04,
}

impl TryFrom<u8> for HeaderMessageType {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::IpResponse),
            0x02 => Ok(Self::SerialPassthruResponse),
            0x03 => Ok(Self::IpRequest),
            0x04 => Ok(Self::SerialPassthruRequest),
            other => Err(FrameError::UnknownMessageType(other)),
        }
    }
}

/// Whether the payload that follows the header is encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum EncryptionFlag {
    #[default]
    Disabled = 0x08,
    Enabled = 0x09,
}

impl TryFrom<u8> for EncryptionFlag {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x08 => Ok(Self::Disabled),
            0x09 => Ok(Self::Enabled),
            other => Err(FrameError::UnknownEncryptionFlag(other)),
        }
    }
}

/// Header command opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HeaderCommand {
    SerialPassthrough = 0x00,
    ConnectToModule = 0xF0,
    LoginStep1 = 0xF2,
    LoginStep2 = 0xF3,
    /// Observed during session setup; meaning undocumented.
    Unknown = 0xF4,
    SerialConnectionInitiated = 0xF8,
    MultiCommand = 0xFB,
    Disconnect = 0xFF,
}

impl HeaderCommand {
    pub const ALL: [HeaderCommand; 8] = [
        HeaderCommand::SerialPassthrough,
        HeaderCommand::ConnectToModule,
        HeaderCommand::LoginStep1,
        HeaderCommand::LoginStep2,
        HeaderCommand::Unknown,
        HeaderCommand::SerialConnectionInitiated,
        HeaderCommand::MultiCommand,
        HeaderCommand::Disconnect,
    ];

    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Look up a known opcode. Panels may answer with codes outside the table.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|cmd| cmd.opcode() == opcode)
    }

    pub fn name(self) -> &'static str {
        match self {
            HeaderCommand::SerialPassthrough => "serial-passthrough",
            HeaderCommand::ConnectToModule => "connect",
            HeaderCommand::LoginStep1 => "login-step1",
            HeaderCommand::LoginStep2 => "login-step2",
            HeaderCommand::Unknown => "unknown",
            HeaderCommand::SerialConnectionInitiated => "serial-connection-initiated",
            HeaderCommand::MultiCommand => "multi-command",
            HeaderCommand::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for HeaderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller-selected header fields.
///
/// Length and encryption flag are missing on purpose: the framing layer
/// derives both from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderTemplate {
    pub message_type: HeaderMessageType,
    pub command: u8,
    pub sub_command: u8,
    pub unknown0: u8,
    pub unknown1: u8,
}

impl HeaderTemplate {
    /// Template for `command` with default reserved fields.
    pub fn for_command(command: HeaderCommand) -> Self {
        Self {
            command: command.opcode(),
            ..Self::default()
        }
    }
}

impl Default for HeaderTemplate {
    fn default() -> Self {
        Self {
            message_type: HeaderMessageType::SerialPassthruRequest,
            command: HeaderCommand::SerialPassthrough.opcode(),
            sub_command: 0x00,
            unknown0: 0x00,
            unknown1: 0x01,
        }
    }
}

/// A complete packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub payload_length: u16,
    pub message_type: HeaderMessageType,
    pub encryption_flag: EncryptionFlag,
    pub command: u8,
    pub sub_command: u8,
    pub unknown0: u8,
    pub unknown1: u8,
}

impl PacketHeader {
    pub(crate) fn from_template(
        template: &HeaderTemplate,
        payload_length: u16,
        encryption_flag: EncryptionFlag,
    ) -> Self {
        Self {
            payload_length,
            message_type: template.message_type,
            encryption_flag,
            command: template.command,
            sub_command: template.sub_command,
            unknown0: template.unknown0,
            unknown1: template.unknown1,
        }
    }

    /// The command as a known opcode, if it is one.
    pub fn header_command(&self) -> Option<HeaderCommand> {
        HeaderCommand::from_opcode(self.command)
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption_flag == EncryptionFlag::Enabled
    }

    /// Serialize the header into its 16-byte wire form.
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0] = START_OF_HEADER;
        buf[1..3].copy_from_slice(&self.payload_length.to_le_bytes());
        buf[3] = self.message_type as u8;
        buf[4] = self.encryption_flag as u8;
        buf[5] = self.command;
        buf[6] = self.sub_command;
        buf[7] = self.unknown0;
        buf[8] = self.unknown1;
        buf
    }

    /// Parse a header from the first 16 bytes of `src`.
    ///
    /// Padding bytes are not checked.
    pub fn parse(src: &[u8]) -> Result<Self> {
        if src.len() < HEADER_SIZE {
            return Err(FrameError::Truncated {
                needed: HEADER_SIZE,
                available: src.len(),
            });
        }
        if src[0] != START_OF_HEADER {
            return Err(FrameError::InvalidStartOfHeader(src[0]));
        }

        Ok(Self {
            payload_length: u16::from_le_bytes([src[1], src[2]]),
            message_type: HeaderMessageType::try_from(src[3])?,
            encryption_flag: EncryptionFlag::try_from(src[4])?,
            command: src[5],
            sub_command: src[6],
            unknown0: src[7],
            unknown1: src[8],
        })
    }
}
