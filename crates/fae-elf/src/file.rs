//! ELF32 file parser.

use rustc_hash::FxHashMap;

use fae_format::{RelocationTable, SectionSizes};

use crate::constants::*;
use crate::header::{ElfHeader, RelEntry, SectionHeader, Symbol};
use crate::{ElfError, Result};

/// Read little-endian u16 from bytes.
#[inline]
fn read_le16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Read little-endian u32 from bytes.
#[inline]
fn read_le32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// A REL relocation section with its decoded entries.
#[derive(Clone, Debug)]
struct RelSection {
    name: String,
    sh_type: u32,
    entries: Vec<RelEntry>,
}

/// Parsed ELF32 file.
#[derive(Clone, Debug)]
pub struct ElfFile {
    pub header: ElfHeader,
    pub sections: Vec<SectionHeader>,
    pub symbols: Vec<Symbol>,
    symbol_values: FxHashMap<String, Vec<u32>>,
    rel_sections: Vec<RelSection>,
    has_symtab: bool,
}

impl ElfFile {
    /// Parse an ELF32 little-endian ARM file from raw bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Self::parse_header(data)?;
        let sections = Self::parse_sections(data, &header)?;
        let (symbols, has_symtab) = Self::parse_symbols(data, &sections)?;
        let rel_sections = Self::parse_rel_sections(data, &sections)?;

        let mut symbol_values: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        for symbol in &symbols {
            if !symbol.name.is_empty() {
                symbol_values
                    .entry(symbol.name.clone())
                    .or_default()
                    .push(symbol.value);
            }
        }

        Ok(Self {
            header,
            sections,
            symbols,
            symbol_values,
            rel_sections,
            has_symtab,
        })
    }

    /// Look up the value of a uniquely defined symbol.
    ///
    /// # Errors
    ///
    /// Fails when the symbol table is missing, the symbol is absent, or
    /// more than one definition carries the name.
    pub fn symbol(&self, name: &str) -> Result<u32> {
        if !self.has_symtab {
            return Err(ElfError::NoSymbolTable);
        }
        match self.symbol_values.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(ElfError::NoSymbol(name.to_string())),
            Some([value]) => Ok(*value),
            Some(_) => Err(ElfError::DuplicateSymbol(name.to_string())),
        }
    }

    /// Extract the five linker-exported region sizes.
    pub fn section_sizes(&self) -> Result<SectionSizes> {
        Ok(SectionSizes {
            entrypoint: self.symbol(SYMBOL_ENTRYPOINT)?,
            rom_size: self.symbol(SYMBOL_ROM_SIZE)?,
            rom_ram_size: self.symbol(SYMBOL_ROM_RAM_SIZE)?,
            got_size: self.symbol(SYMBOL_GOT_SIZE)?,
            ram_size: self.symbol(SYMBOL_RAM_SIZE)?,
        })
    }

    /// Extract the `R_ARM_ABS32` offsets of a named relocation section.
    ///
    /// A missing section yields an empty table (the wire still carries a
    /// zero count). A RELA section or any entry of another relocation type
    /// aborts the extraction.
    pub fn relocation_table(&self, name: &str) -> Result<RelocationTable> {
        let Some(section) = self.rel_sections.iter().find(|s| s.name == name) else {
            return Ok(RelocationTable::default());
        };
        if section.sh_type == SHT_RELA {
            return Err(ElfError::RelaNotSupported(name.to_string()));
        }

        let mut offsets = Vec::with_capacity(section.entries.len());
        for (index, entry) in section.entries.iter().enumerate() {
            if entry.r_type() != R_ARM_ABS32 {
                return Err(ElfError::UnsupportedRelocationKind {
                    section: name.to_string(),
                    index,
                    kind: entry.r_type(),
                });
            }
            offsets.push(entry.offset);
        }
        Ok(RelocationTable::new(offsets))
    }

    fn parse_header(data: &[u8]) -> Result<ElfHeader> {
        if data.len() < EHDR_BYTES {
            return Err(ElfError::TooSmall);
        }

        let magic = read_le32(data, 0);
        if magic != ELF_MAGIC {
            return Err(ElfError::InvalidMagic);
        }

        let class = data[4];
        if class != ELF_CLASS_32 {
            return Err(ElfError::UnsupportedClass(class));
        }
        let encoding = data[5];
        if encoding != ELF_DATA_LSB {
            return Err(ElfError::NotLittleEndian);
        }
        let machine = read_le16(data, 18);
        if machine != EM_ARM {
            return Err(ElfError::NotArm(machine));
        }

        Ok(ElfHeader {
            class,
            data: encoding,
            machine,
            shoff: read_le32(data, 32),
            shentsize: read_le16(data, 46),
            shnum: read_le16(data, 48),
            shstrndx: read_le16(data, 50),
        })
    }

    fn parse_sections(data: &[u8], header: &ElfHeader) -> Result<Vec<SectionHeader>> {
        let mut raw = Vec::with_capacity(header.shnum as usize);
        for i in 0..header.shnum {
            let offset = header.shoff as usize + (i as usize) * (header.shentsize as usize);
            if offset + SHDR_BYTES > data.len() {
                return Err(ElfError::SectionOutOfBounds);
            }
            raw.push((
                read_le32(data, offset),
                SectionHeader {
                    name: String::new(),
                    sh_type: read_le32(data, offset + 4),
                    flags: read_le32(data, offset + 8),
                    addr: read_le32(data, offset + 12),
                    offset: read_le32(data, offset + 16),
                    size: read_le32(data, offset + 20),
                    link: read_le32(data, offset + 24),
                    info: read_le32(data, offset + 28),
                    entsize: read_le32(data, offset + 36),
                },
            ));
        }

        // Resolve names through the section-name string table.
        let strtab_offset = raw
            .get(header.shstrndx as usize)
            .map(|(_, sh)| sh.offset as usize);
        let mut sections = Vec::with_capacity(raw.len());
        for (name_idx, mut section) in raw {
            if let Some(strtab) = strtab_offset {
                section.name = extract_string(data, strtab, name_idx as usize);
            }
            sections.push(section);
        }
        Ok(sections)
    }

    fn parse_symbols(data: &[u8], sections: &[SectionHeader]) -> Result<(Vec<Symbol>, bool)> {
        let Some(symtab) = sections.iter().find(|s| s.sh_type == SHT_SYMTAB) else {
            return Ok((Vec::new(), false));
        };

        let strtab_offset = sections
            .get(symtab.link as usize)
            .map_or(0, |s| s.offset as usize);

        let offset = symtab.offset as usize;
        let size = symtab.size as usize;
        let entsize = if symtab.entsize as usize >= SYM_BYTES {
            symtab.entsize as usize
        } else {
            SYM_BYTES
        };
        if offset + size > data.len() {
            return Err(ElfError::SectionContentOutOfBounds(symtab.name.clone()));
        }

        let mut symbols = Vec::with_capacity(size / entsize);
        for i in 0..size / entsize {
            let base = offset + i * entsize;
            let name_idx = read_le32(data, base) as usize;
            symbols.push(Symbol {
                name: extract_string(data, strtab_offset, name_idx),
                value: read_le32(data, base + 4),
            });
        }
        Ok((symbols, true))
    }

    fn parse_rel_sections(data: &[u8], sections: &[SectionHeader]) -> Result<Vec<RelSection>> {
        let mut rel_sections = Vec::new();
        for section in sections {
            match section.sh_type {
                SHT_REL => {
                    let offset = section.offset as usize;
                    let size = section.size as usize;
                    if offset + size > data.len() {
                        return Err(ElfError::SectionContentOutOfBounds(section.name.clone()));
                    }
                    let count = size / REL_BYTES;
                    let mut entries = Vec::with_capacity(count);
                    for i in 0..count {
                        let base = offset + i * REL_BYTES;
                        entries.push(RelEntry {
                            offset: read_le32(data, base),
                            info: read_le32(data, base + 4),
                        });
                    }
                    rel_sections.push(RelSection {
                        name: section.name.clone(),
                        sh_type: SHT_REL,
                        entries,
                    });
                }
                SHT_RELA => {
                    // Kept so a later lookup by name can reject it.
                    rel_sections.push(RelSection {
                        name: section.name.clone(),
                        sh_type: SHT_RELA,
                        entries: Vec::new(),
                    });
                }
                _ => {}
            }
        }
        Ok(rel_sections)
    }
}

fn extract_string(data: &[u8], strtab_offset: usize, string_offset: usize) -> String {
    let start = strtab_offset + string_offset;
    if start >= data.len() {
        return String::new();
    }
    let end = data[start..]
        .iter()
        .position(|&b| b == 0)
        .map_or(data.len(), |nul| start + nul);
    String::from_utf8_lossy(&data[start..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a minimal ELF32 ARM object in memory for the parser tests.
    struct TestElf {
        shstrtab: Vec<u8>,
        strtab: Vec<u8>,
        symtab: Vec<u8>,
        rel_name: String,
        rel_type: u32,
        rel: Vec<u8>,
    }

    impl TestElf {
        fn new() -> Self {
            Self {
                shstrtab: vec![0],
                strtab: vec![0],
                symtab: vec![0; SYM_BYTES], // null symbol
                rel_name: ".rel.rom.ram".to_string(),
                rel_type: SHT_REL,
                rel: Vec::new(),
            }
        }

        fn shstr(&mut self, name: &str) -> u32 {
            let idx = self.shstrtab.len() as u32;
            self.shstrtab.extend_from_slice(name.as_bytes());
            self.shstrtab.push(0);
            idx
        }

        fn symbol(&mut self, name: &str, value: u32) -> &mut Self {
            let name_idx = self.strtab.len() as u32;
            self.strtab.extend_from_slice(name.as_bytes());
            self.strtab.push(0);
            self.symtab.extend_from_slice(&name_idx.to_le_bytes());
            self.symtab.extend_from_slice(&value.to_le_bytes());
            self.symtab.extend_from_slice(&0u32.to_le_bytes());
            self.symtab.push(0x11); // STB_GLOBAL | STT_OBJECT
            self.symtab.push(0);
            self.symtab.extend_from_slice(&1u16.to_le_bytes());
            self
        }

        fn sizes(&mut self, sizes: &[(&str, u32)]) -> &mut Self {
            for (name, value) in sizes {
                self.symbol(name, *value);
            }
            self
        }

        fn relocation(&mut self, offset: u32, kind: u8) -> &mut Self {
            self.rel.extend_from_slice(&offset.to_le_bytes());
            self.rel.extend_from_slice(&u32::from(kind).to_le_bytes());
            self
        }

        fn build(&mut self) -> Vec<u8> {
            let shstr_null = 0u32;
            let shstr_shstrtab = self.shstr(".shstrtab");
            let shstr_symtab = self.shstr(".symtab");
            let shstr_strtab = self.shstr(".strtab");
            let rel_name = self.rel_name.clone();
            let shstr_rel = self.shstr(&rel_name);

            let shnum = 5u16;
            let shoff = EHDR_BYTES;
            let mut content_offset = shoff + shnum as usize * SHDR_BYTES;

            let mut shdrs = Vec::new();
            let mut push_shdr = |name: u32,
                                 sh_type: u32,
                                 offset: usize,
                                 size: usize,
                                 link: u32,
                                 entsize: u32| {
                let mut sh = Vec::new();
                sh.extend_from_slice(&name.to_le_bytes());
                sh.extend_from_slice(&sh_type.to_le_bytes());
                sh.extend_from_slice(&0u32.to_le_bytes()); // flags
                sh.extend_from_slice(&0u32.to_le_bytes()); // addr
                sh.extend_from_slice(&(offset as u32).to_le_bytes());
                sh.extend_from_slice(&(size as u32).to_le_bytes());
                sh.extend_from_slice(&link.to_le_bytes());
                sh.extend_from_slice(&0u32.to_le_bytes()); // info
                sh.extend_from_slice(&0u32.to_le_bytes()); // addralign
                sh.extend_from_slice(&entsize.to_le_bytes());
                shdrs.push(sh);
            };

            push_shdr(shstr_null, SHT_NULL, 0, 0, 0, 0);
            let shstrtab_offset = content_offset;
            push_shdr(
                shstr_shstrtab,
                SHT_STRTAB,
                shstrtab_offset,
                self.shstrtab.len(),
                0,
                0,
            );
            content_offset += self.shstrtab.len();
            // symtab links to strtab at index 3
            push_shdr(
                shstr_symtab,
                SHT_SYMTAB,
                content_offset,
                self.symtab.len(),
                3,
                SYM_BYTES as u32,
            );
            content_offset += self.symtab.len();
            push_shdr(shstr_strtab, SHT_STRTAB, content_offset, self.strtab.len(), 0, 0);
            content_offset += self.strtab.len();
            push_shdr(
                shstr_rel,
                self.rel_type,
                content_offset,
                self.rel.len(),
                2,
                REL_BYTES as u32,
            );

            let mut out = Vec::new();
            out.extend_from_slice(&ELF_MAGIC.to_le_bytes());
            out.push(ELF_CLASS_32);
            out.push(ELF_DATA_LSB);
            out.push(1); // version
            out.resize(16, 0);
            out.extend_from_slice(&1u16.to_le_bytes()); // e_type = ET_REL
            out.extend_from_slice(&EM_ARM.to_le_bytes());
            out.extend_from_slice(&1u32.to_le_bytes()); // e_version
            out.extend_from_slice(&0u32.to_le_bytes()); // e_entry
            out.extend_from_slice(&0u32.to_le_bytes()); // e_phoff
            out.extend_from_slice(&(shoff as u32).to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
            out.extend_from_slice(&(EHDR_BYTES as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // e_phentsize
            out.extend_from_slice(&0u16.to_le_bytes()); // e_phnum
            out.extend_from_slice(&(SHDR_BYTES as u16).to_le_bytes());
            out.extend_from_slice(&shnum.to_le_bytes());
            out.extend_from_slice(&1u16.to_le_bytes()); // e_shstrndx

            for sh in &shdrs {
                out.extend_from_slice(sh);
            }
            out.extend_from_slice(&self.shstrtab);
            out.extend_from_slice(&self.symtab);
            out.extend_from_slice(&self.strtab);
            out.extend_from_slice(&self.rel);
            out
        }
    }

    const SAMPLE_SIZES: &[(&str, u32)] = &[
        (SYMBOL_ENTRYPOINT, 4),
        (SYMBOL_ROM_SIZE, 8),
        (SYMBOL_ROM_RAM_SIZE, 0),
        (SYMBOL_GOT_SIZE, 4),
        (SYMBOL_RAM_SIZE, 12),
    ];

    #[test]
    fn test_reject_non_elf() {
        assert_eq!(ElfFile::parse(&[0u8; 64]).unwrap_err(), ElfError::InvalidMagic);
        assert_eq!(ElfFile::parse(&[0u8; 8]).unwrap_err(), ElfError::TooSmall);
    }

    #[test]
    fn test_reject_elf64() {
        let mut data = TestElf::new().build();
        data[4] = 2; // ELFCLASS64
        assert_eq!(ElfFile::parse(&data).unwrap_err(), ElfError::UnsupportedClass(2));
    }

    #[test]
    fn test_reject_non_arm() {
        let mut data = TestElf::new().build();
        data[18..20].copy_from_slice(&243u16.to_le_bytes()); // EM_RISCV
        assert_eq!(ElfFile::parse(&data).unwrap_err(), ElfError::NotArm(243));
    }

    #[test]
    fn test_section_sizes() {
        let mut elf = TestElf::new();
        elf.sizes(SAMPLE_SIZES);
        let file = ElfFile::parse(&elf.build()).unwrap();
        let sizes = file.section_sizes().unwrap();
        assert_eq!(sizes.entrypoint, 4);
        assert_eq!(sizes.rom_size, 8);
        assert_eq!(sizes.rom_ram_size, 0);
        assert_eq!(sizes.got_size, 4);
        assert_eq!(sizes.ram_size, 12);
    }

    #[test]
    fn test_missing_symbol() {
        let mut elf = TestElf::new();
        elf.symbol(SYMBOL_ENTRYPOINT, 4);
        let file = ElfFile::parse(&elf.build()).unwrap();
        assert_eq!(
            file.section_sizes().unwrap_err(),
            ElfError::NoSymbol(SYMBOL_ROM_SIZE.to_string())
        );
    }

    #[test]
    fn test_utf8_symbol_name() {
        let mut elf = TestElf::new();
        elf.symbol("größe", 7);
        let file = ElfFile::parse(&elf.build()).unwrap();
        assert_eq!(file.symbol("größe").unwrap(), 7);
    }

    #[test]
    fn test_duplicate_symbol() {
        let mut elf = TestElf::new();
        elf.sizes(SAMPLE_SIZES);
        elf.symbol(SYMBOL_GOT_SIZE, 99);
        let file = ElfFile::parse(&elf.build()).unwrap();
        assert_eq!(
            file.section_sizes().unwrap_err(),
            ElfError::DuplicateSymbol(SYMBOL_GOT_SIZE.to_string())
        );
    }

    #[test]
    fn test_relocation_offsets_in_order() {
        let mut elf = TestElf::new();
        elf.sizes(SAMPLE_SIZES);
        elf.relocation(0x30, R_ARM_ABS32);
        elf.relocation(0x10, R_ARM_ABS32);
        elf.relocation(0x20, R_ARM_ABS32);
        let file = ElfFile::parse(&elf.build()).unwrap();
        let table = file.relocation_table(".rel.rom.ram").unwrap();
        assert_eq!(table.offsets, vec![0x30, 0x10, 0x20]);
    }

    #[test]
    fn test_missing_relocation_section_is_empty() {
        let file = ElfFile::parse(&TestElf::new().build()).unwrap();
        let table = file.relocation_table(".rel.other").unwrap();
        assert!(table.offsets.is_empty());
    }

    #[test]
    fn test_unsupported_relocation_kind() {
        let mut elf = TestElf::new();
        elf.relocation(0x10, R_ARM_ABS32);
        elf.relocation(0x14, 3); // R_ARM_REL32
        let err = ElfFile::parse(&elf.build())
            .unwrap()
            .relocation_table(".rel.rom.ram")
            .unwrap_err();
        assert_eq!(
            err,
            ElfError::UnsupportedRelocationKind {
                section: ".rel.rom.ram".to_string(),
                index: 1,
                kind: 3,
            }
        );
    }

    #[test]
    fn test_rela_rejected() {
        let mut elf = TestElf::new();
        elf.rel_type = SHT_RELA;
        let err = ElfFile::parse(&elf.build())
            .unwrap()
            .relocation_table(".rel.rom.ram")
            .unwrap_err();
        assert_eq!(err, ElfError::RelaNotSupported(".rel.rom.ram".to_string()));
    }
}
