//! framer.rs
//!
//! COBS + optional CRC framing over one caller-owned buffer.
//!
//! Buffer layout (`buffer_size` total bytes):
//!
//! ```text
//! [ COBS overhead | message_offset .. message_offset + max_message_size + crc_size ]
//!   \_____________/ \_____________________________________________________________/
//!    message_offset                  usable message region ("framer buffer")
//! ```
//!
//! `message_offset` is sized to the worst-case COBS overhead for a
//! message of `max_message_size + crc_size` bytes, so the region ahead
//! of it is always enough room for the length-code bytes COBS inserts.
//! Encode writes the message into `[message_offset, ..)`, appends the
//! CRC there too, then COBS-encodes that span into `[0, ..)` of the
//! *same* buffer - COBS output can legitimately extend past
//! `message_offset` (it's sized for overhead, not total output length),
//! which is why encode/decode use the single-buffer, cursor-based COBS
//! variants rather than two disjoint slices.
//!
//! Decode runs the reverse: `read_byte` appends incoming bytes at
//! `read_pos`, and on a zero byte, COBS-decodes `[0, length)` in place
//! back into `[0, ..)`, verifies the CRC, then moves the payload up to
//! `message_offset` so every decoded frame is found at the same offset
//! regardless of how much COBS overhead its particular byte pattern
//! needed - giving callers a single consistent pointer to read a
//! message from.

use crate::cobs::{self, overhead};
use crate::crc;
use crate::error::{CobsDecodeStatus, CobsEncodeStatus, DecodeOutcome, FramerError};

/// Which CRC (if any) the framer appends after the message and
/// verifies on decode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CrcKind {
    None,
    Crc8,
    Crc16,
    Crc32,
}

impl CrcKind {
    pub const fn size(self) -> usize {
        match self {
            CrcKind::None => 0,
            CrcKind::Crc8 => 1,
            CrcKind::Crc16 => 2,
            CrcKind::Crc32 => 4,
        }
    }
}

/// Compute the total buffer size a [`Framer`] needs for a given
/// `max_message_size` and `crc_kind`.
pub const fn buffer_size_for(max_message_size: usize, crc_kind: CrcKind) -> usize {
    overhead(max_message_size + crc_kind.size()) + max_message_size + crc_kind.size() + 1
}

/// Result of a successful [`Framer::encode`]: the encoded frame,
/// including its trailing zero terminator, always lives at the start
/// of the framer's buffer.
pub struct EncodedFrame {
    pub len: usize,
}

/// Result of a successful decode: the message (without CRC) lives at
/// `framer.message_buffer()[..len]`.
pub struct DecodedFrame {
    pub len: usize,
}

/// COBS+CRC framer over one borrowed buffer.
pub struct Framer<'a> {
    buffer: &'a mut [u8],
    max_message_size: usize,
    message_offset: usize,
    crc_kind: CrcKind,
    read_pos: usize,
}

impl<'a> Framer<'a> {
    pub fn new(buffer: &'a mut [u8], max_message_size: usize, crc_kind: CrcKind) -> Self {
        let message_offset = overhead(max_message_size + crc_kind.size());
        Self {
            buffer,
            max_message_size,
            message_offset,
            crc_kind,
            read_pos: 0,
        }
    }

    /// Usable message region: `max_message_size` bytes plus room for
    /// one discriminant/type byte, matching the protocol layer's
    /// convention of storing the tag as the first message byte.
    pub fn buffer_len(&self) -> usize {
        self.max_message_size + 1
    }

    /// Mutable access to the message region, for writing a message (or
    /// the protocol's tag+payload) before calling [`Framer::encode`].
    pub fn message_buffer(&mut self) -> &mut [u8] {
        let end = self.message_offset + self.buffer_len();
        &mut self.buffer[self.message_offset..end]
    }

    fn append_crc(&mut self, length: usize) {
        let start = self.message_offset;
        match self.crc_kind {
            CrcKind::None => {}
            CrcKind::Crc8 => {
                let c = crc::crc8(&self.buffer[start..start + length], 0);
                self.buffer[start + length] = c;
            }
            CrcKind::Crc16 => {
                let c = crc::crc16(&self.buffer[start..start + length], 0);
                self.buffer[start + length..start + length + 2].copy_from_slice(&c.to_le_bytes());
            }
            CrcKind::Crc32 => {
                let c = crc::crc32(&self.buffer[start..start + length], 0);
                self.buffer[start + length..start + length + 4].copy_from_slice(&c.to_le_bytes());
            }
        }
    }

    fn verify_crc(&self, length: usize) -> bool {
        match self.crc_kind {
            CrcKind::None => true,
            CrcKind::Crc8 => {
                let expected = self.buffer[length];
                crc::crc8(&self.buffer[..length], 0) == expected
            }
            CrcKind::Crc16 => {
                let expected = u16::from_le_bytes([self.buffer[length], self.buffer[length + 1]]);
                crc::crc16(&self.buffer[..length], 0) == expected
            }
            CrcKind::Crc32 => {
                let expected = u32::from_le_bytes([
                    self.buffer[length],
                    self.buffer[length + 1],
                    self.buffer[length + 2],
                    self.buffer[length + 3],
                ]);
                crc::crc32(&self.buffer[..length], 0) == expected
            }
        }
    }

    /// Encode `length` bytes already written at the start of
    /// [`Framer::message_buffer`] into a COBS+CRC frame at the start of
    /// the framer's buffer, including the trailing zero terminator.
    pub fn encode(&mut self, length: usize) -> Result<EncodedFrame, FramerError> {
        let crc_size = self.crc_kind.size();
        self.append_crc(length);

        let (status, out_len) = cobs::encode_overlapping(self.buffer, self.message_offset, length + crc_size);
        if status != CobsEncodeStatus::Ok {
            return Err(FramerError::MessageTooLarge);
        }
        self.buffer[out_len] = 0;
        Ok(EncodedFrame { len: out_len + 1 })
    }

    /// The encoded bytes from the most recent successful `encode`,
    /// ready to hand to a transport's write.
    pub fn encoded_frame(&self, frame: &EncodedFrame) -> &[u8] {
        &self.buffer[..frame.len]
    }

    /// Decode a complete COBS frame of `length` bytes (including the
    /// trailing zero) that has been written at the start of the
    /// buffer.
    fn decode_frame(&mut self, mut length: usize) -> Result<DecodedFrame, DecodeOutcome> {
        if length == 1 {
            return Err(DecodeOutcome::Failure);
        }
        length -= 1; // discard the null terminator

        let (status, out_len) = cobs::decode_overlapping(self.buffer, length);
        if status != CobsDecodeStatus::Ok {
            return Err(DecodeOutcome::Failure);
        }

        let crc_size = self.crc_kind.size();
        if out_len < crc_size {
            return Err(DecodeOutcome::Failure);
        }
        let msg_len = out_len - crc_size;

        if crc_size > 0 && !self.verify_crc(msg_len) {
            return Err(DecodeOutcome::CrcFailure);
        }

        if self.message_offset > 0 {
            self.buffer.copy_within(0..msg_len, self.message_offset);
        }

        Ok(DecodedFrame { len: msg_len })
    }

    /// Feed one byte received from the transport. Returns
    /// `Ok(DecodedFrame)` once a full, valid frame has arrived; the
    /// message is then available at `message_buffer()[..len]`.
    pub fn read_byte(&mut self, byte: u8) -> Result<Option<DecodedFrame>, DecodeOutcome> {
        self.buffer[self.read_pos] = byte;
        let length = self.read_pos + 1;

        if byte == 0 {
            self.read_pos = 0;
            return self.decode_frame(length).map(Some);
        }

        if length == self.buffer.len() {
            self.read_pos = 0;
            return Err(DecodeOutcome::BufferOverrun);
        }

        self.read_pos += 1;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_buffer(max_message_size: usize, crc_kind: CrcKind) -> heapless::Vec<u8, 512> {
        let size = buffer_size_for(max_message_size, crc_kind);
        let mut v = heapless::Vec::new();
        v.resize(size, 0u8).unwrap();
        v
    }

    #[test]
    fn encode_no_crc_matches_reference_vector() {
        let mut storage = make_buffer(8, CrcKind::None);
        let mut framer = Framer::new(&mut storage, 8, CrcKind::None);
        framer.message_buffer()[..4].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
        let frame = framer.encode(4).unwrap();
        assert_eq!(framer.encoded_frame(&frame), &[0x05, 0x11, 0x22, 0x33, 0x44, 0x00]);
    }

    #[test]
    fn encode_crc8_matches_reference_vector() {
        let mut storage = make_buffer(8, CrcKind::Crc8);
        let mut framer = Framer::new(&mut storage, 8, CrcKind::Crc8);
        framer.message_buffer()[..4].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
        let frame = framer.encode(4).unwrap();
        assert_eq!(
            framer.encoded_frame(&frame),
            &[0x06, 0x11, 0x22, 0x33, 0x44, 0xf9, 0x00]
        );
    }

    #[test]
    fn decode_round_trip_no_crc() {
        let mut storage = make_buffer(8, CrcKind::None);
        let mut framer = Framer::new(&mut storage, 8, CrcKind::None);
        framer.message_buffer()[..4].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
        let frame = framer.encode(4).unwrap();
        let len = frame.len;
        let mut encoded = [0u8; 16];
        encoded[..len].copy_from_slice(framer.encoded_frame(&frame));

        let mut decode_storage = make_buffer(8, CrcKind::None);
        let mut decoder = Framer::new(&mut decode_storage, 8, CrcKind::None);
        let mut result = None;
        for &b in &encoded[..len] {
            if let Some(frame) = decoder.read_byte(b).unwrap() {
                result = Some(frame);
            }
        }
        let decoded = result.unwrap();
        assert_eq!(decoded.len, 4);
        assert_eq!(&decoder.message_buffer()[..4], &[0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn decode_crc8_failure_on_corrupted_payload() {
        let mut storage = make_buffer(8, CrcKind::Crc8);
        let mut framer = Framer::new(&mut storage, 8, CrcKind::Crc8);
        framer.message_buffer()[..4].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
        let frame = framer.encode(4).unwrap();
        let len = frame.len;
        let mut encoded = [0u8; 16];
        encoded[..len].copy_from_slice(framer.encoded_frame(&frame));
        // flip a payload byte after encoding so CRC no longer matches
        encoded[1] = 0xFF;

        let mut decode_storage = make_buffer(8, CrcKind::Crc8);
        let mut decoder = Framer::new(&mut decode_storage, 8, CrcKind::Crc8);
        let mut last = Ok(None);
        for &b in &encoded[..len] {
            last = decoder.read_byte(b);
            if last.is_err() {
                break;
            }
        }
        assert_eq!(last, Err(DecodeOutcome::CrcFailure));
    }

    #[test]
    fn buffer_overrun_reported_before_terminator() {
        // buffer sized for a 2-byte max message, no CRC
        let mut storage = make_buffer(2, CrcKind::None);
        let mut framer = Framer::new(&mut storage, 2, CrcKind::None);
        let garbage = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut outcome = Ok(None);
        for &b in &garbage {
            outcome = framer.read_byte(b);
            if outcome.is_err() {
                break;
            }
        }
        assert_eq!(outcome, Err(DecodeOutcome::BufferOverrun));
    }

    #[test]
    fn single_byte_frame_is_a_decode_failure() {
        let mut storage = make_buffer(8, CrcKind::None);
        let mut framer = Framer::new(&mut storage, 8, CrcKind::None);
        assert_eq!(framer.read_byte(0), Err(DecodeOutcome::Failure));
    }

    #[test]
    fn empty_cobs_body_with_crc_enabled_is_a_decode_failure_not_a_panic() {
        // `01 00`: a legal empty-payload COBS encoding (spec vector #2)
        // fed to a framer that expects a trailing CRC. There aren't
        // enough decoded bytes to hold the CRC, let alone a message -
        // this must report `Failure`, never underflow/panic/index out
        // of bounds computing `out_len - crc_size`.
        for crc_kind in [CrcKind::Crc8, CrcKind::Crc16, CrcKind::Crc32] {
            let mut storage = make_buffer(8, crc_kind);
            let mut framer = Framer::new(&mut storage, 8, crc_kind);
            assert_eq!(framer.read_byte(0x01), Ok(None));
            assert_eq!(framer.read_byte(0x00), Err(DecodeOutcome::Failure));
        }
    }
}
