//! Single-byte checksum carried in the last byte of checksummed payloads.
//!
//! The checksum is a running byte sum truncated to 8 bits, not a CRC.

/// Compute the wrapping byte sum of `data`.
pub fn compute(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, byte| acc.wrapping_add(*byte))
}

/// Write the checksum of `buf[..len - 1]` into `buf[len - 1]`.
///
/// Recomputing on an already stamped buffer yields the same byte. Empty
/// buffers are left untouched.
pub fn stamp(buf: &mut [u8]) {
    if let Some((last, body)) = buf.split_last_mut() {
        *last = compute(body);
    }
}

/// Returns true if the last byte of `buf` matches the sum of the bytes before it.
pub fn verify(buf: &[u8]) -> bool {
    match buf.split_last() {
        Some((last, body)) => compute(body) == *last,
        None => false,
    }
}
