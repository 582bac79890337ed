//! Debugger-initialization script generation.
//!
//! Pure formatting over already-validated metadata: every symbol load
//! address is a linear offset from the flash base (for the stored image)
//! or the RAM base (for the regions the CRT0 relocates at load time).

use std::fmt::Write;
use std::path::Path;

use fae_format::{SectionSizes, WORD_BYTES};

/// Inputs for the script generator.
#[derive(Clone, Debug)]
pub struct GdbinitInput<'a> {
    /// Absolute path of the CRT0 ELF (for `add-symbol-file`).
    pub crt0_elf: &'a Path,
    /// Absolute path of the partition ELF.
    pub partition_elf: &'a Path,
    /// CRT0 stub size in bytes.
    pub crt0_size: u32,
    /// Total relocation-table bytes in the image (count words included).
    pub relocation_bytes: u32,
    /// Partition region sizes.
    pub sizes: SectionSizes,
    /// Flash base address; a fill-in comment is emitted when absent.
    pub flash_base: Option<u32>,
    /// RAM base address; a fill-in comment is emitted when absent.
    pub ram_base: Option<u32>,
}

impl GdbinitInput<'_> {
    /// Bytes preceding the code region in flash: CRT0, the binary-size
    /// word, and the relocation tables.
    #[must_use]
    pub const fn metadata_size(&self) -> u32 {
        self.crt0_size + WORD_BYTES as u32 + self.relocation_bytes
    }
}

/// Render the gdb initialization script.
#[must_use]
pub fn generate(input: &GdbinitInput<'_>) -> String {
    let GdbinitInput {
        crt0_elf,
        partition_elf,
        crt0_size: _,
        relocation_bytes: _,
        sizes,
        flash_base,
        ram_base,
    } = input;
    let metadata = input.metadata_size();

    let mut out = String::new();
    let _ = match flash_base {
        Some(base) => writeln!(out, "set $flash_base = {base:#x}"),
        None => writeln!(out, "set $flash_base = # Define the flash base address here"),
    };
    let _ = match ram_base {
        Some(base) => writeln!(out, "set $ram_base = {base:#x}"),
        None => writeln!(out, "set $ram_base = # Define the RAM base address here"),
    };

    let _ = writeln!(out, "set $crt0_text = $flash_base");
    let _ = writeln!(out, "set $text = $crt0_text + {metadata}");
    let _ = writeln!(out, "set $got = $text + {}", sizes.rom_size);
    let _ = writeln!(out, "set $data = $got + {}", sizes.got_size);
    let _ = writeln!(out, "set $rel_got = $ram_base");
    let _ = writeln!(out, "set $rel_data = $rel_got + {}", sizes.got_size);
    let _ = writeln!(out, "set $bss = $rel_data + {}", sizes.rom_ram_size);
    let _ = writeln!(
        out,
        "add-symbol-file {} -s .text $crt0_text",
        crt0_elf.display()
    );
    let _ = writeln!(
        out,
        "add-symbol-file {} -s .rom $text -s .got $rel_got -s .rom.ram $rel_data -s .ram $bss",
        partition_elf.display()
    );
    let _ = writeln!(
        out,
        "set $flash_end = $flash_base + {}",
        metadata + sizes.rom_size + sizes.got_size + sizes.rom_ram_size
    );
    let _ = writeln!(
        out,
        "set $ram_end = $ram_base + {}",
        sizes.got_size + sizes.rom_ram_size + sizes.ram_size
    );
    out
}
