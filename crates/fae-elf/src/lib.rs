//! ELF32 front end for FAE partitions.
//!
//! Extracts the pieces the FAE encoder needs from a linked partition ELF:
//! the five linker-exported size symbols and the `R_ARM_ABS32` relocation
//! offsets of the exported relocation sections. Raw partition bytes are
//! obtained separately through objcopy; this crate never produces them.

mod constants;
mod file;
mod header;

pub use constants::*;
pub use file::ElfFile;
pub use header::*;

use thiserror::Error;

/// ELF parsing and extraction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElfError {
    #[error("ELF data too small")]
    TooSmall,
    #[error("Invalid ELF magic number")]
    InvalidMagic,
    #[error("Only little-endian ELF supported")]
    NotLittleEndian,
    #[error("Unsupported ELF class: {0}")]
    UnsupportedClass(u8),
    #[error("Not an ARM ELF: machine {0}")]
    NotArm(u16),
    #[error("Section header out of bounds")]
    SectionOutOfBounds,
    #[error("Section content out of bounds: {0}")]
    SectionContentOutOfBounds(String),
    #[error("No symbol table section")]
    NoSymbolTable,
    #[error("No symbol named {0}")]
    NoSymbol(String),
    #[error("More than one symbol named {0}")]
    DuplicateSymbol(String),
    #[error("Relocation section {0} uses unsupported RELA entries")]
    RelaNotSupported(String),
    #[error("Unsupported relocation type {kind} in {section}, entry {index}")]
    UnsupportedRelocationKind {
        section: String,
        index: usize,
        kind: u8,
    },
}

pub type Result<T> = std::result::Result<T, ElfError>;
