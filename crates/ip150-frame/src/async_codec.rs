//! `tokio_util::codec` adapter for packet streams.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::FrameError;
use crate::packet::{decode_packet, Packet, MAX_PAYLOAD_SIZE};

/// Tokio codec for IP150 packet framing.
#[derive(Debug, Clone)]
pub struct PacketCodec {
    max_payload_size: usize,
}

impl PacketCodec {
    /// Create a new codec with default settings.
    pub fn new() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }

    /// Create a codec with a custom max payload size.
    pub fn with_max_payload(max_payload_size: usize) -> Self {
        Self { max_payload_size }
    }
}

impl Default for PacketCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        decode_packet(src, self.max_payload_size)
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Packet>>::encode(self, &item, dst)
    }
}

impl Encoder<&Packet> for PacketCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.payload().len() > self.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: item.payload().len(),
                max: self.max_payload_size,
            });
        }
        item.encode(dst);
        Ok(())
    }
}
