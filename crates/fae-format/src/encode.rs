//! Layout assembler.
//!
//! Concatenates the CRT0 stub, the self-describing size field, the
//! relocation tables, and the partition bytes, then pads to the MPU
//! alignment and terminates with the footer. The whole image is built in
//! memory; callers write it with a single `fs::write` so no partial file
//! is ever observable.

use crate::constants::{FOOTER_BYTES, MPU_ALIGNMENT, PADDING_BYTE, WORD_BYTES};
use crate::footer::{Footer, SectionSizes};
use crate::{FormatError, Result};

/// Ordered `R_ARM_ABS32` offsets for one relocation section.
///
/// The wire form is a u32 entry count followed by the offsets, one LE word
/// each. Order is preserved from the object file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelocationTable {
    pub offsets: Vec<u32>,
}

impl RelocationTable {
    #[must_use]
    pub const fn new(offsets: Vec<u32>) -> Self {
        Self { offsets }
    }

    /// Encoded size in bytes: the count word plus one word per entry.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        WORD_BYTES + self.offsets.len() * WORD_BYTES
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.offsets.len() as u32).to_le_bytes());
        for offset in &self.offsets {
            out.extend_from_slice(&offset.to_le_bytes());
        }
    }
}

/// Round `value` up to the next multiple of `align` (a power of two).
#[must_use]
pub const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

/// Assemble a FAE image.
///
/// The emitted length is a multiple of [`MPU_ALIGNMENT`](crate::MPU_ALIGNMENT)
/// and equals the `BinarySize` word stored after the CRT0 chunk.
///
/// # Errors
///
/// Returns [`FormatError::EmptyCrt0`] when `crt0` is empty; the decoder
/// rejects such images, so the encoder refuses to produce them.
pub fn encode(
    crt0: &[u8],
    sizes: &SectionSizes,
    relocations: &[RelocationTable],
    partition: &[u8],
) -> Result<Vec<u8>> {
    if crt0.is_empty() {
        return Err(FormatError::EmptyCrt0);
    }

    let relocation_bytes: usize = relocations.iter().map(RelocationTable::encoded_len).sum();
    let raw_size = crt0.len() + WORD_BYTES + relocation_bytes + partition.len();

    let mut padding = align_up(raw_size, MPU_ALIGNMENT) - raw_size;
    // The footer lives inside the reserved tail. When the natural padding
    // cannot hold it, reserve one more alignment block.
    if padding < FOOTER_BYTES {
        padding += MPU_ALIGNMENT;
    }
    padding -= FOOTER_BYTES;

    let total_size = raw_size + padding + FOOTER_BYTES;

    let mut out = Vec::with_capacity(total_size);
    out.extend_from_slice(crt0);
    out.extend_from_slice(&(total_size as u32).to_le_bytes());
    for table in relocations {
        table.write_to(&mut out);
    }
    out.extend_from_slice(partition);
    out.resize(out.len() + padding, PADDING_BYTE);
    out.extend_from_slice(&Footer::new(sizes, crt0.len() as u32).encode());

    debug_assert_eq!(out.len(), total_size);
    debug_assert_eq!(out.len() % MPU_ALIGNMENT, 0);
    Ok(out)
}
