//! Panel memory read requests.
//!
//! ```text
//! ┌────────────┬─────────┬──────┬─────────────┬────────┬──────────┐
//! │ Start (2B) │ Control │ 0x00 │ Address     │ Length │ Checksum │
//! │ 0x08 0x50  │ (1B)    │ (1B) │ (2B LE)     │ (1B)   │ (1B)     │
//! └────────────┴─────────┴──────┴─────────────┴────────┴──────────┘
//! ```

use crate::error::{FrameError, Result};
use crate::packet::Payload;

/// Serialized size of a memory request, checksum byte included.
pub const MEMORY_REQUEST_SIZE: usize = 8;

/// Message-start marker `0x5008`, written little-endian.
pub const MEMORY_REQUEST_START: [u8; 2] = [0x08, 0x50];

/// Smallest number of bytes a single request may read.
pub const MIN_READ_LENGTH: u8 = 1;

/// Largest number of bytes a single request may read.
pub const MAX_READ_LENGTH: u8 = 64;

/// Control byte used for every RAM read.
pub const RAM_CONTROL_BYTE: u8 = 0x80;

/// Panel address space targeted by a memory request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Non-volatile configuration memory, addressable up to 18 bits.
    Eprom,
    /// Live status memory.
    Ram,
}

impl Region {
    /// Control byte for a read of `address` in this region.
    pub fn control_byte(self, address: u32) -> u8 {
        match self {
            Region::Ram => RAM_CONTROL_BYTE,
            Region::Eprom if address > 0xFFFF => {
                let mut control = 0u8;
                if address & (1 << 16) != 0 {
                    control |= 0x01;
                }
                if address & (1 << 17) != 0 {
                    control |= 0x02;
                }
                control
            }
            Region::Eprom => 0x00,
        }
    }
}

/// A request to read `length` bytes of panel memory starting at `address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRequest {
    address: u32,
    length: u8,
    region: Region,
}

impl MemoryRequest {
    /// Create a memory request, rejecting lengths outside `1..=64`.
    pub fn new(address: u32, length: u8, region: Region) -> Result<Self> {
        if !(MIN_READ_LENGTH..=MAX_READ_LENGTH).contains(&length) {
            return Err(FrameError::InvalidMemoryRequest { length });
        }
        Ok(Self {
            address,
            length,
            region,
        })
    }

    pub fn eprom(address: u32, length: u8) -> Result<Self> {
        Self::new(address, length, Region::Eprom)
    }

    pub fn ram(address: u32, length: u8) -> Result<Self> {
        Self::new(address, length, Region::Ram)
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn control_byte(&self) -> u8 {
        self.region.control_byte(self.address)
    }

    /// Serialize the request with a zeroed checksum placeholder.
    pub fn serialize(&self) -> [u8; MEMORY_REQUEST_SIZE] {
        let mut buf = [0u8; MEMORY_REQUEST_SIZE];
        buf[0..2].copy_from_slice(&MEMORY_REQUEST_START);
        buf[2] = self.control_byte();
        buf[3] = 0x00;
        // Bits above 15 travel in the control byte.
        buf[4..6].copy_from_slice(&((self.address & 0xFFFF) as u16).to_le_bytes());
        buf[6] = self.length;
        buf
    }
}

impl Payload for MemoryRequest {
    fn to_payload_bytes(&self) -> Vec<u8> {
        self.serialize().to_vec()
    }

    fn checksummed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn eprom_layout() {
        let req = MemoryRequest::eprom(0x00F0, 16).unwrap();
        assert_eq!(
            req.serialize(),
            [0x08, 0x50, 0x00, 0x00, 0xF0, 0x00, 0x10, 0x00]
        );
    }

    #[test]
    fn eprom_control_byte_tracks_high_address_bits() {
        assert_eq!(Region::Eprom.control_byte(0x0_FFFF), 0x00);
        assert_eq!(Region::Eprom.control_byte(0x1_0000), 0x01);
        assert_eq!(Region::Eprom.control_byte(0x2_0000), 0x02);
        assert_eq!(Region::Eprom.control_byte(0x3_1234), 0x03);
    }

    #[test]
    fn eprom_extended_address_keeps_low_bits_in_address_field() {
        let bytes = MemoryRequest::eprom(0x1_2345, 8).unwrap().serialize();
        assert_eq!(bytes[2], 0x01);
        assert_eq!(&bytes[4..6], &[0x45, 0x23]);
    }

    #[test]
    fn ram_control_byte_is_constant() {
        let bytes = MemoryRequest::ram(0x1_0010, 32).unwrap().serialize();
        assert_eq!(bytes[2], RAM_CONTROL_BYTE);
        assert_eq!(&bytes[4..6], &[0x10, 0x00]);
    }

    #[test]
    fn rejects_zero_length() {
        let err = MemoryRequest::eprom(0, 0).unwrap_err();
        assert!(matches!(err, FrameError::InvalidMemoryRequest { length: 0 }));
    }

    #[test]
    fn rejects_length_above_limit() {
        let err = MemoryRequest::ram(0, 65).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidMemoryRequest { length: 65 }
        ));
    }

    #[test]
    fn accepts_length_bounds() {
        assert!(MemoryRequest::ram(0, MIN_READ_LENGTH).is_ok());
        assert!(MemoryRequest::ram(0, MAX_READ_LENGTH).is_ok());
    }

    proptest! {
        #[test]
        fn serialized_size_and_length_byte(
            address in 0u32..0x4_0000,
            length in 1u8..=64,
            ram in any::<bool>(),
        ) {
            let region = if ram { Region::Ram } else { Region::Eprom };
            let bytes = MemoryRequest::new(address, length, region).unwrap().serialize();
            prop_assert_eq!(bytes.len(), MEMORY_REQUEST_SIZE);
            prop_assert_eq!(bytes[6], length);
        }

        #[test]
        fn eprom_low_addresses_have_zero_control(address in 0u32..0x1_0000) {
            prop_assert_eq!(Region::Eprom.control_byte(address), 0x00);
        }

        #[test]
        fn ram_control_ignores_address(address in any::<u32>()) {
            prop_assert_eq!(Region::Ram.control_byte(address), 0x80);
        }
    }
}
