//! Footer codec.
//!
//! The footer is the fixed 28-byte trailer that makes an image
//! self-describing: the five region sizes, the entry point, the CRT0 size,
//! and the combined magic-and-version word.

use crate::constants::{
    FOOTER_BYTES, FOOTER_CRT0_SIZE, FOOTER_ENTRYPOINT, FOOTER_GOT_SIZE, FOOTER_MAGIC,
    FOOTER_RAM_SIZE, FOOTER_ROM_RAM_SIZE, FOOTER_ROM_SIZE, MAGIC_NUMBER,
    MAGIC_NUMBER_AND_VERSION, VERSION,
};
use crate::{FormatError, Result};

/// Region sizes extracted from the partition's linker-exported symbols.
///
/// `entrypoint` is the offset of `start` within the code region. `ram_size`
/// is the zero-initialized (BSS) size; it is metadata only and never stored
/// in the image body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionSizes {
    pub entrypoint: u32,
    pub rom_size: u32,
    pub rom_ram_size: u32,
    pub got_size: u32,
    pub ram_size: u32,
}

/// Decoded footer fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footer {
    pub ram_size: u32,
    pub got_size: u32,
    pub rom_size: u32,
    pub rom_ram_size: u32,
    pub entrypoint: u32,
    pub crt0_size: u32,
}

impl Footer {
    #[must_use]
    pub const fn new(sizes: &SectionSizes, crt0_size: u32) -> Self {
        Self {
            ram_size: sizes.ram_size,
            got_size: sizes.got_size,
            rom_size: sizes.rom_size,
            rom_ram_size: sizes.rom_ram_size,
            entrypoint: sizes.entrypoint,
            crt0_size,
        }
    }

    /// Encode to the 28-byte wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; FOOTER_BYTES] {
        let mut out = [0u8; FOOTER_BYTES];
        put_u32(&mut out, FOOTER_RAM_SIZE, self.ram_size);
        put_u32(&mut out, FOOTER_GOT_SIZE, self.got_size);
        put_u32(&mut out, FOOTER_ROM_SIZE, self.rom_size);
        put_u32(&mut out, FOOTER_ROM_RAM_SIZE, self.rom_ram_size);
        put_u32(&mut out, FOOTER_ENTRYPOINT, self.entrypoint);
        put_u32(&mut out, FOOTER_CRT0_SIZE, self.crt0_size);
        put_u32(&mut out, FOOTER_MAGIC, MAGIC_NUMBER_AND_VERSION);
        out
    }

    /// Decode and validate the 28-byte wire form.
    ///
    /// The magic word carries the version in its low bits, so validation is
    /// a two-step check: the word must not be below the magic constant, and
    /// subtracting the constant must leave exactly the supported version.
    pub fn decode(bytes: &[u8; FOOTER_BYTES]) -> Result<Self> {
        let magic_and_version = get_u32(bytes, FOOTER_MAGIC);
        if magic_and_version < MAGIC_NUMBER {
            return Err(FormatError::InvalidMagic(magic_and_version));
        }
        let version = magic_and_version - MAGIC_NUMBER;
        if version != VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        Ok(Self {
            ram_size: get_u32(bytes, FOOTER_RAM_SIZE),
            got_size: get_u32(bytes, FOOTER_GOT_SIZE),
            rom_size: get_u32(bytes, FOOTER_ROM_SIZE),
            rom_ram_size: get_u32(bytes, FOOTER_ROM_RAM_SIZE),
            entrypoint: get_u32(bytes, FOOTER_ENTRYPOINT),
            crt0_size: get_u32(bytes, FOOTER_CRT0_SIZE),
        })
    }
}

fn put_u32(out: &mut [u8; FOOTER_BYTES], offset: usize, value: u32) {
    out[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn get_u32(bytes: &[u8; FOOTER_BYTES], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}
