//! picoframe: byte-exact serialization, COBS framing and a tagged
//! protocol multiplexer for no-heap embedded targets.
//!
//! Layers, bottom to top:
//!
//! - [`buffer`] - a non-owning read/write/seek cursor over a borrowed
//!   byte slice.
//! - [`heap`] / [`array`] - a bump allocator and an alignment-safe typed
//!   view over its output, for variable-length fields that don't fit
//!   inline storage.
//! - [`crc`] - table-driven CRC-8/16/32.
//! - [`cobs`] - Consistent Overhead Byte Stuffing.
//! - [`serializer`] - byte-exact primitive/array/string/record encoding
//!   on top of [`buffer::Buffer`].
//! - [`framer`] - COBS+CRC framing of one message buffer, encode and
//!   byte-at-a-time decode.
//! - [`protocol`] - a tag-byte multiplexer tying a [`framer::Framer`]
//!   to a caller-supplied transport.
//!
//! Nothing here allocates: every buffer, heap region and framer is
//! borrowed from the caller for exactly as long as it's needed.

#![cfg_attr(not(test), no_std)]

pub mod array;
pub mod buffer;
pub mod cobs;
pub mod crc;
pub mod error;
pub mod framer;
pub mod heap;
pub mod protocol;
pub mod serializer;

pub use buffer::Buffer;
pub use error::{
    BufferError, CobsDecodeStatus, CobsEncodeStatus, DecodeOutcome, FramerError, HeapError,
    ProtocolError, SerializeError,
};
pub use framer::{CrcKind, Framer};
pub use heap::Heap;
pub use protocol::{Protocol, Record, Transport};
