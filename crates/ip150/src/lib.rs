//! Paradox IP150 packet codec.
//!
//! # Crate Structure
//!
//! - [`frame`]: packet header, payload encoders, checksum and stream adapters
//!
//! The `cli` feature builds the `ip150` binary, which encodes and decodes
//! packets offline for debugging captures.

/// Re-export frame types.
pub mod frame {
    pub use ip150_frame::*;
}
