use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::checksum;
use crate::envelope::EncryptionEnvelope;
use crate::error::{FrameError, Result};
use crate::header::{EncryptionFlag, HeaderTemplate, PacketHeader, HEADER_SIZE};

/// Largest payload the 16-bit header length field can describe.
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Something that can be carried as a packet payload.
pub trait Payload {
    /// The plaintext payload bytes, checksum placeholder included.
    fn to_payload_bytes(&self) -> Vec<u8>;

    /// Whether the last byte is a checksum slot to be stamped.
    fn checksummed(&self) -> bool;
}

/// Raw bytes are sent as given, without a checksum.
impl Payload for [u8] {
    fn to_payload_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }

    fn checksummed(&self) -> bool {
        false
    }
}

impl Payload for Bytes {
    fn to_payload_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }

    fn checksummed(&self) -> bool {
        false
    }
}

/// A framed IP150 packet: header plus payload.
///
/// The header length always matches the payload it was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: PacketHeader,
    payload: Bytes,
}

impl Packet {
    /// Build an unencrypted packet.
    pub fn new<P: Payload + ?Sized>(template: HeaderTemplate, payload: &P) -> Result<Self> {
        Self::build(template, payload, None)
    }

    /// Build a packet whose payload is encrypted by `envelope`.
    pub fn encrypted<P: Payload + ?Sized>(
        template: HeaderTemplate,
        payload: &P,
        envelope: &dyn EncryptionEnvelope,
    ) -> Result<Self> {
        Self::build(template, payload, Some(envelope))
    }

    /// Build a packet.
    ///
    /// The checksum is stamped on the plaintext payload. Encryption, when
    /// requested, runs afterwards and the header is sized from the bytes that
    /// actually go on the wire.
    pub fn build<P: Payload + ?Sized>(
        template: HeaderTemplate,
        payload: &P,
        envelope: Option<&dyn EncryptionEnvelope>,
    ) -> Result<Self> {
        let mut body = payload.to_payload_bytes();
        if payload.checksummed() {
            checksum::stamp(&mut body);
        }

        let (body, encryption_flag) = match envelope {
            Some(envelope) => (envelope.encrypt(&body), EncryptionFlag::Enabled),
            None => (body, EncryptionFlag::Disabled),
        };

        if body.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge {
                size: body.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let header = PacketHeader::from_template(&template, body.len() as u16, encryption_flag);
        tracing::debug!(
            command = header.command,
            payload_len = body.len(),
            encrypted = header.is_encrypted(),
            "built packet"
        );

        Ok(Self {
            header,
            payload: Bytes::from(body),
        })
    }

    pub fn header(&self) -> &PacketHeader {
        &self.header
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Returns true if the payload's last byte is a valid checksum.
    ///
    /// Only meaningful for unencrypted, checksummed payloads.
    pub fn checksum_valid(&self) -> bool {
        checksum::verify(&self.payload)
    }

    /// The total wire size of this packet (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Append the wire form of this packet to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(self.wire_size());
        dst.put_slice(&self.header.serialize());
        dst.put_slice(&self.payload);
    }

    /// The wire form of this packet.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// Decode a packet from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete packet yet.
/// On success, consumes the packet bytes from the buffer.
pub fn decode_packet(src: &mut BytesMut, max_payload: usize) -> Result<Option<Packet>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let header = PacketHeader::parse(&src[..HEADER_SIZE])?;
    let payload_len = header.payload_length as usize;

    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();
    tracing::debug!(command = header.command, payload_len, "decoded packet");

    Ok(Some(Packet { header, payload }))
}

/// Decode exactly one packet from a complete buffer.
pub fn parse_packet(src: &[u8]) -> Result<Packet> {
    let mut buf = BytesMut::from(src);
    match decode_packet(&mut buf, MAX_PAYLOAD_SIZE)? {
        Some(packet) => Ok(packet),
        None => {
            let needed = match PacketHeader::parse(src) {
                Ok(header) => HEADER_SIZE + header.payload_length as usize,
                Err(_) => HEADER_SIZE,
            };
            Err(FrameError::Truncated {
                needed,
                available: src.len(),
            })
        }
    }
}

/// Configuration for packet streams.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Maximum accepted payload size in bytes. Default: `u16::MAX`.
    pub max_payload_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{PartitionCommand, PartitionCommandKind};
    use crate::header::{HeaderCommand, HeaderMessageType};
    use crate::memory::MemoryRequest;

    /// Reverses the payload and appends a marker so tests can see it ran.
    struct ReverseEnvelope;

    impl EncryptionEnvelope for ReverseEnvelope {
        fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
            let mut out: Vec<u8> = plaintext.iter().rev().copied().collect();
            out.push(0xEE);
            out
        }
    }

    #[test]
    fn eprom_read_end_to_end() {
        let request = MemoryRequest::eprom(0x00F0, 16).unwrap();
        let packet = Packet::new(
            HeaderTemplate::for_command(HeaderCommand::ConnectToModule),
            &request,
        )
        .unwrap();

        assert_eq!(packet.header().command, 0xF0);
        assert_eq!(packet.header().payload_length, 8);
        assert_eq!(
            packet.payload().as_ref(),
            &[0x08, 0x50, 0x00, 0x00, 0xF0, 0x00, 0x10, 0x58]
        );

        let wire = packet.to_bytes();
        assert_eq!(wire.len(), 24);
        assert_eq!(packet.wire_size(), 24);
        assert_eq!(wire[0], 0xAA);
        assert_eq!(&wire[1..3], &[0x08, 0x00]);
        assert_eq!(wire[4], EncryptionFlag::Disabled as u8);
        assert_eq!(&wire[16..], packet.payload().as_ref());
    }

    #[test]
    fn partition_command_is_checksummed() {
        let cmd = PartitionCommand::new(1, PartitionCommandKind::Arm).unwrap();
        let packet = Packet::new(HeaderTemplate::default(), &cmd).unwrap();

        assert_eq!(packet.header().payload_length, 15);
        assert_eq!(packet.payload()[14], 0x40 + 0x0F + 0x20);
        assert!(packet.checksum_valid());
    }

    #[test]
    fn raw_payload_is_not_stamped() {
        let packet = Packet::new(HeaderTemplate::default(), &b"\x01\x02\x03"[..]).unwrap();
        assert_eq!(packet.payload().as_ref(), b"\x01\x02\x03");
    }

    #[test]
    fn encryption_sets_flag_and_sizes_from_ciphertext() {
        let request = MemoryRequest::ram(0x0010, 4).unwrap();
        let packet =
            Packet::encrypted(HeaderTemplate::default(), &request, &ReverseEnvelope).unwrap();

        assert!(packet.header().is_encrypted());
        assert_eq!(packet.header().payload_length, 9);
        // Checksum was stamped before the envelope reversed the bytes.
        let plain_checksum = 0x08u8 + 0x50 + 0x80 + 0x10 + 0x04;
        assert_eq!(packet.payload()[0], plain_checksum);
        assert_eq!(packet.payload()[8], 0xEE);
    }

    #[test]
    fn oversized_payload_rejected() {
        let big = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        let err = Packet::new(HeaderTemplate::default(), big.as_slice()).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let template = HeaderTemplate {
            message_type: HeaderMessageType::IpResponse,
            command: 0x37,
            sub_command: 0x01,
            unknown0: 0x02,
            unknown1: 0x03,
        };
        let packet = Packet::new(template, &b"status"[..]).unwrap();
        let mut buf = BytesMut::new();
        packet.encode(&mut buf);

        let decoded = decode_packet(&mut buf, MAX_PAYLOAD_SIZE).unwrap().unwrap();
        assert_eq!(decoded, packet);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0xAA, 0x08, 0x00][..]);
        assert!(decode_packet(&mut buf, MAX_PAYLOAD_SIZE).unwrap().is_none());
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let packet = Packet::new(HeaderTemplate::default(), &b"hello"[..]).unwrap();
        let mut buf = BytesMut::new();
        packet.encode(&mut buf);
        buf.truncate(HEADER_SIZE + 2);

        assert!(decode_packet(&mut buf, MAX_PAYLOAD_SIZE).unwrap().is_none());
        assert_eq!(buf.len(), HEADER_SIZE + 2);
    }

    #[test]
    fn test_decode_invalid_start_of_header() {
        let mut buf = BytesMut::from(&[0u8; HEADER_SIZE][..]);
        let result = decode_packet(&mut buf, MAX_PAYLOAD_SIZE);
        assert!(matches!(result, Err(FrameError::InvalidStartOfHeader(0))));
    }

    #[test]
    fn test_decode_payload_too_large() {
        let packet = Packet::new(HeaderTemplate::default(), &[0u8; 32][..]).unwrap();
        let mut buf = BytesMut::new();
        packet.encode(&mut buf);

        let result = decode_packet(&mut buf, 16);
        assert!(matches!(
            result,
            Err(FrameError::PayloadTooLarge { size: 32, max: 16 })
        ));
    }

    #[test]
    fn test_multiple_packets() {
        let first = Packet::new(HeaderTemplate::default(), &b"first"[..]).unwrap();
        let second = Packet::new(
            HeaderTemplate::for_command(HeaderCommand::Disconnect),
            &b"second"[..],
        )
        .unwrap();
        let mut buf = BytesMut::new();
        first.encode(&mut buf);
        second.encode(&mut buf);

        let p1 = decode_packet(&mut buf, MAX_PAYLOAD_SIZE).unwrap().unwrap();
        let p2 = decode_packet(&mut buf, MAX_PAYLOAD_SIZE).unwrap().unwrap();
        assert_eq!(p1.payload().as_ref(), b"first");
        assert_eq!(p2.header().header_command(), Some(HeaderCommand::Disconnect));
        assert!(buf.is_empty());
    }

    #[test]
    fn parse_packet_reports_missing_bytes() {
        let packet = Packet::new(HeaderTemplate::default(), &b"abcd"[..]).unwrap();
        let wire = packet.to_bytes();

        let err = parse_packet(&wire[..HEADER_SIZE + 1]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Truncated {
                needed: 20,
                available: 17
            }
        ));
        assert_eq!(parse_packet(&wire).unwrap(), packet);
    }
}
