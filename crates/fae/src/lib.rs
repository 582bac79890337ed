//! FAE firmware image tools.
//!
//! Builds FAE flash images from partition ELFs and inspects existing
//! images. The container codec itself lives in `fae-format`; this crate
//! adds the ELF front end glue, the external-tool collaborators (make,
//! objcopy, objdump), and the presentation layer.

// Re-export from sub-crates
pub use fae_elf::{ElfError, ElfFile};
pub use fae_format::{
    FaeImage, Footer, FormatError, MINIMAL_BYTES, MPU_ALIGNMENT, RelocationTable, SectionSizes,
    encode,
};

mod error;
pub mod gdbinit;
pub mod hexdump;
pub mod terminal;
pub mod tools;

pub use error::{Error, Result};
