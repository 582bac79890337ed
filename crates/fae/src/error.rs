use std::path::PathBuf;

use thiserror::Error;

/// FAE tool errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Format error: {0}")]
    Format(#[from] fae_format::FormatError),
    #[error("ELF error: {0}")]
    Elf(#[from] fae_elf::ElfError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{tool} failed with status {status}: {stderr}")]
    Tool {
        tool: String,
        status: i32,
        stderr: String,
    },
    #[error("Bad input filename {0}: expected something like name.elf")]
    BadInputName(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
