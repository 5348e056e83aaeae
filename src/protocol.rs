//! protocol.rs
//!
//! The protocol multiplexer: a single discriminant (tag) byte in front
//! of a record's encoded payload, framed by one [`Framer`] and moved
//! over a caller-supplied [`Transport`]. This is the piece a schema
//! compiler's generated code sits on top of (see [`Record`]); it is
//! also usable directly by hand-written records, which is what the
//! tests below do.
//!
//! Generated (or hand-written) code is expected to provide, per message
//! type, a `const TAG: u8` and a [`Record`] impl; `Protocol::send` and
//! `Protocol::decode` do the rest.

use crate::buffer::Buffer;
use crate::framer::{CrcKind, Framer};
use crate::heap::Heap;
use crate::error::{ProtocolError, SerializeError};

/// What a generated (or hand-written) message record must provide to
/// be sent/received through a [`Protocol`].
pub trait Record: Sized {
    /// Upper bound on this record's packed size, used by callers sizing
    /// a `Protocol`'s buffer; not enforced by `pack` itself.
    const MAX_ENCODED_SIZE: usize;

    fn pack(&self, buf: &mut Buffer) -> Result<(), SerializeError>;

    /// `heap` is `None` when the caller has no heap configured; records
    /// with no variable-length fields should ignore it. A record that
    /// needs a heap and doesn't get one should fail with
    /// `SerializeError::NoHeapProvided`.
    fn unpack(buf: &mut Buffer, heap: Option<&mut Heap>) -> Result<Self, SerializeError>;
}

/// The byte-stream transport a [`Protocol`] reads from and writes to.
/// `read_byte` returning `None` means "no byte available right now,
/// call `poll` again later" - the non-blocking contract `poll` relies
/// on to stay callable from a bare loop with no blocking I/O.
pub trait Transport {
    fn read_byte(&mut self) -> Option<u8>;
    /// Returns the number of bytes actually accepted.
    fn write(&mut self, data: &[u8]) -> usize;
}

/// Tag and payload length of the most recently decoded frame.
struct LastMessage {
    tag: u8,
    payload_len: usize,
}

/// Discriminant-tagged message multiplexer over one framer and one
/// transport.
pub struct Protocol<'a, T: Transport> {
    framer: Framer<'a>,
    transport: T,
    last_message: Option<LastMessage>,
}

impl<'a, T: Transport> Protocol<'a, T> {
    pub fn new(buffer: &'a mut [u8], max_message_size: usize, crc_kind: CrcKind, transport: T) -> Self {
        Self {
            framer: Framer::new(buffer, max_message_size, crc_kind),
            transport,
            last_message: None,
        }
    }

    /// Direct access to the tag+payload region, for the zero-copy send
    /// path (`send_raw`) or for a generated `pack` to write straight
    /// into without an intermediate copy.
    pub fn message_buffer(&mut self) -> &mut [u8] {
        self.framer.message_buffer()
    }

    /// Pull at most one byte from the transport and forward it to the
    /// framer. Returns `true` once that byte completed a valid frame
    /// (inspect it with [`Protocol::decode`]); `false` if no byte was
    /// available yet, or the byte was accepted but didn't complete a
    /// frame, or it completed a malformed one. Malformed frames (CRC
    /// failure, COBS failure, buffer overrun) are logged and skipped
    /// rather than surfaced, since a framing error on the wire is
    /// routinely caused by noise or a dropped byte and the right
    /// response is simply to keep resynchronizing on the next zero
    /// byte.
    ///
    /// Callers MUST call `poll` repeatedly - once per available byte -
    /// until it returns `false` with nothing left to read, since each
    /// call consumes at most one byte.
    pub fn poll(&mut self) -> bool {
        let Some(byte) = self.transport.read_byte() else {
            return false;
        };
        match self.framer.read_byte(byte) {
            Ok(Some(frame)) => {
                let tag = self.framer.message_buffer()[0];
                self.last_message = Some(LastMessage {
                    tag,
                    payload_len: frame.len - 1,
                });
                true
            }
            Ok(None) => false,
            Err(_outcome) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("picoframe: dropping malformed frame");
                false
            }
        }
    }

    /// Encode and send `record` tagged with `tag`.
    pub fn send<R: Record>(&mut self, tag: u8, record: &R) -> Result<(), ProtocolError> {
        let payload_len = {
            let mbuf = self.framer.message_buffer();
            mbuf[0] = tag;
            let mut buf = Buffer::new(&mut mbuf[1..]);
            record.pack(&mut buf)?;
            buf.pos()
        };
        self.send_raw(tag, payload_len)
    }

    /// Zero-copy send: the caller has already written `payload_len`
    /// bytes into `message_buffer()[1..]` (and the tag into
    /// `message_buffer()[0]`, which this overwrites with `tag` anyway).
    pub fn send_raw(&mut self, tag: u8, payload_len: usize) -> Result<(), ProtocolError> {
        self.framer.message_buffer()[0] = tag;
        let frame = self.framer.encode(1 + payload_len)?;
        let written = self.transport.write(self.framer.encoded_frame(&frame));
        if written != frame.len {
            return Err(ProtocolError::ShortWrite);
        }
        Ok(())
    }

    /// Decode the most recently received frame as an `R`, if its tag
    /// matches `expected_tag`. Returns `ProtocolError::NoMessage` if
    /// `poll` hasn't produced a frame yet, and
    /// `ProtocolError::UnexpectedMessageType` if a frame arrived but
    /// carries a different tag - mirroring a schema compiler's
    /// generated per-type decode function, which only succeeds for its
    /// own message type.
    pub fn decode<R: Record>(
        &mut self,
        expected_tag: u8,
        heap: Option<&mut Heap>,
    ) -> Result<R, ProtocolError> {
        let last = self.last_message.as_ref().ok_or(ProtocolError::NoMessage)?;
        if last.tag != expected_tag {
            return Err(ProtocolError::UnexpectedMessageType);
        }
        let payload_len = last.payload_len;
        let mbuf = self.framer.message_buffer();
        let mut buf = Buffer::new(&mut mbuf[1..1 + payload_len]);
        R::unpack(&mut buf, heap).map_err(Into::into)
    }

    /// The tag of the most recently decoded frame, if any - lets a
    /// caller dispatch on tag before committing to a `decode::<R>()`
    /// call.
    pub fn last_tag(&self) -> Option<u8> {
        self.last_message.as_ref().map(|m| m.tag)
    }
}
