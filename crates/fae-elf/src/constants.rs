//! ELF32 specification constants and the FAE partition symbol contract.

// ELF identification
pub const ELF_MAGIC: u32 = 0x464C_457F; // 0x7F 'E' 'L' 'F'
pub const ELF_CLASS_32: u8 = 1;
pub const ELF_DATA_LSB: u8 = 1;
pub const EM_ARM: u16 = 40;

// Structure sizes (ELF32)
pub const EHDR_BYTES: usize = 52;
pub const SHDR_BYTES: usize = 40;
pub const SYM_BYTES: usize = 16;
pub const REL_BYTES: usize = 8;

// Section header types
pub const SHT_NULL: u32 = 0;
pub const SHT_SYMTAB: u32 = 2;
pub const SHT_STRTAB: u32 = 3;
pub const SHT_RELA: u32 = 4;
pub const SHT_REL: u32 = 9;

// ARM relocation types (low byte of r_info)
pub const R_ARM_ABS32: u8 = 2;

// Linker-exported symbols carrying the partition region sizes.
pub const SYMBOL_ENTRYPOINT: &str = "start";
pub const SYMBOL_ROM_SIZE: &str = "__rom_size";
pub const SYMBOL_ROM_RAM_SIZE: &str = "__rom_ram_size";
pub const SYMBOL_GOT_SIZE: &str = "__got_size";
pub const SYMBOL_RAM_SIZE: &str = "__ram_size";

/// Relocation sections exported into the image, in wire order.
pub const EXPORTED_RELOCATION_SECTIONS: &[&str] = &[".rel.rom.ram"];
