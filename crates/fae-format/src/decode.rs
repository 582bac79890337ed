//! Layout walker.
//!
//! Validates an untrusted byte sequence against the footer it carries and
//! recovers the chunk boundaries. The walk is strictly sequential: each
//! chunk's start is derived from the previous chunk's end, and every
//! footer-declared size is independently re-checked against the total
//! length. The footer and the inline counters are redundant and must
//! agree; any disagreement is fatal.

use std::ops::Range;

use crate::constants::{FOOTER_BYTES, MINIMAL_BYTES, WORD_BYTES};
use crate::cursor::Cursor;
use crate::footer::Footer;
use crate::{FormatError, Result};

/// A validated FAE image: footer fields plus the chunk boundaries.
///
/// Chunk fields are byte ranges into the buffer that was parsed. Optional
/// chunks are `None` when their footer-declared size is zero. The BSS
/// region is metadata only and has no chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaeImage {
    pub footer: Footer,
    /// CRT0 stub, always `[0, crt0_size)`.
    pub crt0: Range<usize>,
    /// Decoded relocation offsets, in wire order.
    pub relocations: Vec<u32>,
    /// Byte range of the relocation entries (excluding the count word).
    pub relocation_entries: Option<Range<usize>>,
    /// Initialized-data region.
    pub rom_ram: Option<Range<usize>>,
    /// Code region.
    pub rom: Option<Range<usize>>,
    /// Global offset table.
    pub got: Option<Range<usize>>,
    /// Zero-initialized region size, materialized by the loader at runtime.
    pub bss_size: u32,
}

impl FaeImage {
    /// Walk and validate `data` as a FAE image.
    ///
    /// # Errors
    ///
    /// Any structural violation is terminal; see [`FormatError`] for the
    /// failure kinds.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let len = data.len();
        if len <= MINIMAL_BYTES {
            return Err(FormatError::EmptyOrTruncated {
                len,
                min: MINIMAL_BYTES,
            });
        }

        let mut tail = [0u8; FOOTER_BYTES];
        tail.copy_from_slice(&data[len - FOOTER_BYTES..]);
        let footer = Footer::decode(&tail)?;

        check_field("CRT0 size", footer.crt0_size, len)?;
        if footer.crt0_size == 0 {
            return Err(FormatError::EmptyCrt0);
        }

        let mut cursor = Cursor::new(data);
        let crt0 = cursor.take(footer.crt0_size as usize, "CRT0 size")?;

        let stored_size = cursor.read_u32("binary size")?;
        if stored_size as usize != len {
            return Err(FormatError::SizeMismatch {
                stored: stored_size,
                actual: len,
            });
        }

        let relocation_count = cursor.read_u32("relocation count")?;
        let relocation_bytes = u64::from(relocation_count) * WORD_BYTES as u64;
        if relocation_bytes >= len as u64 {
            return Err(FormatError::FieldOutOfBounds {
                field: "relocation entries size",
                value: relocation_bytes,
                len,
            });
        }
        let mut relocations = Vec::with_capacity(relocation_count as usize);
        let relocation_entries = if relocation_count > 0 {
            let entries = cursor.take(relocation_bytes as usize, "relocation entries")?;
            let mut entry_cursor = Cursor::new(data);
            entry_cursor.seek(entries.start, "relocation entries")?;
            for _ in 0..relocation_count {
                relocations.push(entry_cursor.read_u32("relocation entry")?);
            }
            Some(entries)
        } else {
            None
        };

        check_field("entrypoint offset", footer.entrypoint, len)?;

        check_field("rom_ram size", footer.rom_ram_size, len)?;
        let rom_ram = if footer.rom_ram_size > 0 {
            Some(cursor.take(footer.rom_ram_size as usize, "rom_ram size")?)
        } else {
            None
        };

        check_field("rom size", footer.rom_size, len)?;
        let rom = if footer.rom_size > 0 {
            let chunk = cursor.take(footer.rom_size as usize, "rom size")?;
            if footer.entrypoint > footer.rom_size {
                return Err(FormatError::EntrypointOutOfRange {
                    entrypoint: footer.entrypoint,
                    rom_size: footer.rom_size,
                });
            }
            Some(chunk)
        } else {
            None
        };

        check_field("GOT size", footer.got_size, len)?;
        // The GOT follows the code region. When there is no code chunk the
        // reference behavior is undefined; the GOT then begins at the
        // running cursor, directly after the last chunk that was present.
        let got = if footer.got_size > 0 {
            Some(cursor.take(footer.got_size as usize, "GOT size")?)
        } else {
            None
        };

        // The BSS size is reported, never bounds-checked: the region is not
        // stored in the image.
        let bss_size = footer.ram_size;

        Ok(Self {
            footer,
            crt0,
            relocations,
            relocation_entries,
            rom_ram,
            rom,
            got,
            bss_size,
        })
    }
}

/// Reject a footer field whose magnitude reaches the total length.
fn check_field(field: &'static str, value: u32, len: usize) -> Result<()> {
    if value as usize >= len {
        return Err(FormatError::FieldOutOfBounds {
            field,
            value: u64::from(value),
            len,
        });
    }
    Ok(())
}
