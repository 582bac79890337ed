//! Codec for the FAE firmware container.
//!
//! A FAE image packages a CRT0 bootstrap stub, a relocation table, and the
//! raw partition bytes (code, GOT, initialized data) of an embedded
//! firmware, terminated by a fixed 28-byte footer:
//!
//! ```text
//! [CRT0][BinarySize:4][RelocCount:4][RelocOffsets...][Data][Code][GOT][Padding][Footer:28]
//! ```
//!
//! The encoder ([`encode`]) assembles an image from already-extracted
//! inputs; the decoder ([`FaeImage::parse`]) walks an untrusted byte
//! sequence back into validated, bounds-checked chunks.

mod constants;
mod cursor;
mod decode;
mod encode;
mod footer;

pub use constants::*;
pub use cursor::Cursor;
pub use decode::FaeImage;
pub use encode::{RelocationTable, align_up, encode};
pub use footer::{Footer, SectionSizes};

use thiserror::Error;

/// FAE container format errors.
///
/// Every error is fatal to the current encode or decode; there is no
/// partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("input is empty or truncated: {len} bytes (minimum {min})")]
    EmptyOrTruncated { len: usize, min: usize },
    #[error("invalid magic number: {0:#010x}")]
    InvalidMagic(u32),
    #[error("unsupported format version: {0:#x}")]
    UnsupportedVersion(u32),
    #[error("embedded binary size ({stored}) differs from actual length ({actual})")]
    SizeMismatch { stored: u32, actual: usize },
    #[error("{field} ({value}) is greater than or equal to binary size ({len})")]
    FieldOutOfBounds {
        field: &'static str,
        value: u64,
        len: usize,
    },
    #[error("CRT0 size is zero")]
    EmptyCrt0,
    #[error("entrypoint offset ({entrypoint}) is outside the code region ({rom_size} bytes)")]
    EntrypointOutOfRange { entrypoint: u32, rom_size: u32 },
}

pub type Result<T> = std::result::Result<T, FormatError>;
