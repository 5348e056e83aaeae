//! buffer.rs
//!
//! A non-owning cursor over a caller-provided `&mut [u8]`. This is the
//! lowest layer everything else is built on: the serializer reads and
//! writes through it, and the framer hands it the COBS-decoded message
//! region so generated `Record::unpack` code never touches raw pointers.
//!
//! `seek` and `read`/`write` disagree on whether `pos == size()` is
//! valid - that's intentional, not a bug, see the note on `seek` below.

use crate::error::BufferError;

/// Cursor over a borrowed byte slice.
pub struct Buffer<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> Buffer<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Reset the cursor to the start without touching the underlying
    /// bytes.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Copy `data` into the buffer at the current position, advancing
    /// it. Fails if `data` would not fit before `size()`.
    pub fn write(&mut self, data: &[u8]) -> Result<(), BufferError> {
        let end_pos = self.pos + data.len();
        if end_pos > self.data.len() {
            return Err(BufferError::Overflow);
        }
        self.data[self.pos..end_pos].copy_from_slice(data);
        self.pos = end_pos;
        Ok(())
    }

    /// Copy `out.len()` bytes from the current position into `out`,
    /// advancing it. Fails if that would read past `size()`.
    pub fn read(&mut self, out: &mut [u8]) -> Result<(), BufferError> {
        let end_pos = self.pos + out.len();
        if end_pos > self.data.len() {
            return Err(BufferError::Underflow);
        }
        out.copy_from_slice(&self.data[self.pos..end_pos]);
        self.pos = end_pos;
        Ok(())
    }

    /// Move the cursor to an absolute position.
    ///
    /// Unlike `read`/`write`, which tolerate advancing exactly to
    /// `size()` (a buffer that's been completely filled or drained),
    /// `seek` rejects `pos == size()` - there is no byte *at* that
    /// position to seek to. Preserved as-is; this is an existing
    /// contract, not something to "fix".
    pub fn seek(&mut self, pos: usize) -> Result<(), BufferError> {
        if pos >= self.data.len() {
            return Err(BufferError::SeekOutOfRange);
        }
        self.pos = pos;
        Ok(())
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Direct access to the underlying bytes, for callers (the framer)
    /// that need to hand a contiguous region to COBS/CRC routines.
    pub fn as_slice(&self) -> &[u8] {
        self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data
    }
}
