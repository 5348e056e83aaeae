//! error.rs
//!
//! Error types for every layer (buffer, heap, serializer, COBS, framer,
//! protocol). Plain enums, no `std::error::Error` — this crate is
//! `no_std` and has no use for a trait object hierarchy. Each enum
//! optionally derives `defmt::Format` behind the `defmt` feature so a
//! caller can log a failure with `defmt::warn!("{}", err)` on target.

#[cfg(feature = "defmt")]
use defmt::Format;

/// Errors from [`crate::buffer::Buffer`] read/write/seek operations.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum BufferError {
    /// A write would advance past the end of the buffer.
    Overflow,
    /// A read would consume past the end of the buffer (or past what
    /// was written).
    Underflow,
    /// `seek(pos)` was called with `pos >= size()`.
    SeekOutOfRange,
}

/// Errors from [`crate::heap::Heap`] allocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum HeapError {
    /// Not enough remaining heap bytes for the requested allocation.
    OutOfMemory,
}

/// Errors from the serializer, returned by generated/hand-written
/// [`crate::protocol::Record`] `pack`/`unpack` implementations.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum SerializeError {
    Buffer(BufferError),
    Heap(HeapError),
    /// A fixed-capacity inline array/string could not hold the decoded
    /// element or byte count.
    CapacityExceeded,
    /// A variable-length array or string was present on the wire but no
    /// heap was supplied to `unpack`.
    NoHeapProvided,
}

impl From<BufferError> for SerializeError {
    fn from(e: BufferError) -> Self {
        SerializeError::Buffer(e)
    }
}

impl From<HeapError> for SerializeError {
    fn from(e: HeapError) -> Self {
        SerializeError::Heap(e)
    }
}

/// Status from [`crate::cobs::encode`] (bitmask-shaped in the original,
/// flattened to an enum here since Rust callers match rather than
/// test bits).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum CobsEncodeStatus {
    Ok,
    OutBufferOverflow,
}

/// Status from [`crate::cobs::decode`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum CobsDecodeStatus {
    Ok,
    OutBufferOverflow,
    ZeroByteInInput,
    InputTooShort,
}

/// Outcome of feeding one byte to [`crate::framer::Framer::read_byte`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum DecodeOutcome {
    /// Frame not yet complete; keep feeding bytes.
    NotReady,
    /// Malformed COBS data (zero byte inside the encoded span, or a
    /// length code pointing past the end of what was received).
    Failure,
    /// COBS decoded cleanly but the trailing CRC did not match.
    CrcFailure,
    /// The frame would not fit in the framer's buffer before a
    /// terminating zero byte arrived.
    BufferOverrun,
}

/// Errors surfaced by [`crate::framer::Framer::encode`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum FramerError {
    /// Message (plus CRC) does not fit in the framer's COBS output
    /// region.
    MessageTooLarge,
}

/// Errors from [`crate::protocol::Protocol`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum ProtocolError {
    Framer(FramerError),
    Serialize(SerializeError),
    /// `decode::<R>()` was called but the last received frame carried a
    /// different discriminant than `R` expects.
    UnexpectedMessageType,
    /// No frame has been received yet (nothing to decode).
    NoMessage,
    /// The transport's `write` did not accept the whole encoded frame.
    ShortWrite,
}

impl From<FramerError> for ProtocolError {
    fn from(e: FramerError) -> Self {
        ProtocolError::Framer(e)
    }
}

impl From<SerializeError> for ProtocolError {
    fn from(e: SerializeError) -> Self {
        ProtocolError::Serialize(e)
    }
}
