//! Bounds-checked byte cursor.
//!
//! The decoder walks the image strictly left to right; every read goes
//! through this cursor so an oversized field produces a typed error
//! instead of a wrong slice.

use std::ops::Range;

use crate::{FormatError, Result, WORD_BYTES};

/// A running position over a byte buffer with checked reads.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current position in bytes from the start of the buffer.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute position.
    pub fn seek(&mut self, pos: usize, field: &'static str) -> Result<()> {
        if pos > self.data.len() {
            return Err(FormatError::FieldOutOfBounds {
                field,
                value: pos as u64,
                len: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Read a little-endian u32 and advance.
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        let range = self.take(WORD_BYTES, field)?;
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(&self.data[range]);
        Ok(u32::from_le_bytes(word))
    }

    /// Claim `len` bytes at the cursor and advance past them.
    ///
    /// Returns the claimed range into the underlying buffer.
    pub fn take(&mut self, len: usize, field: &'static str) -> Result<Range<usize>> {
        let end = self.pos.checked_add(len).filter(|&e| e <= self.data.len());
        let Some(end) = end else {
            return Err(FormatError::FieldOutOfBounds {
                field,
                value: len as u64,
                len: self.data.len(),
            });
        };
        let range = self.pos..end;
        self.pos = end;
        Ok(range)
    }
}
