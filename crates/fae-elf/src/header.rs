//! ELF32 header structures.

/// ELF file header.
#[derive(Clone, Debug)]
pub struct ElfHeader {
    pub class: u8,
    pub data: u8,
    pub machine: u16,
    pub shoff: u32,
    pub shentsize: u16,
    pub shnum: u16,
    pub shstrndx: u16,
}

/// Section header.
#[derive(Clone, Debug)]
pub struct SectionHeader {
    /// Resolved section name.
    pub name: String,
    pub sh_type: u32,
    pub flags: u32,
    pub addr: u32,
    pub offset: u32,
    pub size: u32,
    pub link: u32,
    pub info: u32,
    pub entsize: u32,
}

/// Symbol table entry. Only the name and value take part in the size
/// contract; the rest of the wire entry is skipped.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub value: u32,
}

/// REL-style relocation entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelEntry {
    pub offset: u32,
    pub info: u32,
}

impl RelEntry {
    /// Relocation type, the low byte of `r_info`.
    #[must_use]
    pub const fn r_type(self) -> u8 {
        (self.info & 0xFF) as u8
    }
}
