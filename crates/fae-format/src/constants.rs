//! FAE format-contract constants.
//!
//! These values define the wire format. They are shared by the encoder and
//! decoder and are not runtime-tunable.

/// Reserved magic pattern. The low byte is zero so the version can be OR'd in.
pub const MAGIC_NUMBER: u32 = 0xFACA_DE00;
/// Supported format version.
pub const VERSION: u32 = 0x10;
/// Combined magic-and-version word stored in the footer.
pub const MAGIC_NUMBER_AND_VERSION: u32 = MAGIC_NUMBER | VERSION;

/// Size of every scalar field on the wire.
pub const WORD_BYTES: usize = 4;
/// Size of the fixed trailer.
pub const FOOTER_BYTES: usize = 28;
/// Smallest legal image: binary-size field + relocation-count field + footer.
pub const MINIMAL_BYTES: usize = WORD_BYTES + WORD_BYTES + FOOTER_BYTES;

// Footer field offsets within the 28-byte trailer. The trailer occupies the
// last 28 bytes of the image, so field N sits at `len - 28 + N`.
pub const FOOTER_RAM_SIZE: usize = 0;
pub const FOOTER_GOT_SIZE: usize = 4;
pub const FOOTER_ROM_SIZE: usize = 8;
pub const FOOTER_ROM_RAM_SIZE: usize = 12;
pub const FOOTER_ENTRYPOINT: usize = 16;
pub const FOOTER_CRT0_SIZE: usize = 20;
pub const FOOTER_MAGIC: usize = 24;

/// Fill value for alignment padding. Matches the erased state of NAND flash.
pub const PADDING_BYTE: u8 = 0xFF;
/// Minimum alignment required by the ARMv7-M MPU.
pub const MPU_ALIGNMENT: usize = 32;

/// File extension for FAE images.
pub const FAE_EXTENSION: &str = "fae";
