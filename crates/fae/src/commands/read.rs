//! Read command: validate a FAE image and report its chunk layout.

use std::fmt::Write as _;
use std::fs;
use std::ops::Range;
use std::path::Path;

use tracing::error;

use fae::hexdump::hexdump;
use fae::tools::{Disassembler, ObjdumpDisassembler};
use fae::{FaeImage, Result};

use crate::cli::{DumpArgs, EXIT_FAILURE, EXIT_SUCCESS};

pub fn cmd_read(input: &Path, dump: DumpArgs) -> i32 {
    let dump = dump.resolve();
    match report(input, dump, &ObjdumpDisassembler) {
        Ok(text) => {
            print!("{text}");
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Invalid FAE image {}: {e}", input.display());
            EXIT_FAILURE
        }
    }
}

fn report(input: &Path, dump: DumpArgs, disassembler: &dyn Disassembler) -> Result<String> {
    let data = fs::read(input)?;
    let image = FaeImage::parse(&data)?;
    render(&data, &image, dump, disassembler)
}

fn render(
    data: &[u8],
    image: &FaeImage,
    dump: DumpArgs,
    disassembler: &dyn Disassembler,
) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "FAE image: {} bytes", data.len());
    // parse() already validated the magic word against this constant.
    let _ = writeln!(out, "magic: {:#010x}", fae_format::MAGIC_NUMBER_AND_VERSION);

    chunk_line(&mut out, "CRT0", Some(&image.crt0));
    if dump.disasm_crt0 {
        out.push_str(&disassembler.disassemble(&data[image.crt0.clone()])?);
    }
    if dump.dump_crt0 {
        out.push_str(&hexdump(&data[image.crt0.clone()]));
    }

    chunk_line(&mut out, "relocation table", image.relocation_entries.as_ref());
    let _ = writeln!(out, "relocation entries: {}", image.relocations.len());
    if dump.dump_reloc {
        if let Some(entries) = &image.relocation_entries {
            out.push_str(&hexdump(&data[entries.clone()]));
        }
    }

    chunk_line(&mut out, ".rom.ram (data)", image.rom_ram.as_ref());
    if dump.dump_data {
        if let Some(rom_ram) = &image.rom_ram {
            out.push_str(&hexdump(&data[rom_ram.clone()]));
        }
    }

    chunk_line(&mut out, ".rom (code)", image.rom.as_ref());
    let _ = writeln!(out, "entrypoint offset: {:#x}", image.footer.entrypoint);
    if let Some(rom) = &image.rom {
        if dump.disasm_code {
            out.push_str(&disassembler.disassemble(&data[rom.clone()])?);
        }
        if dump.dump_code {
            out.push_str(&hexdump(&data[rom.clone()]));
        }
    }

    chunk_line(&mut out, ".got", image.got.as_ref());
    if dump.dump_got {
        if let Some(got) = &image.got {
            out.push_str(&hexdump(&data[got.clone()]));
        }
    }

    let _ = writeln!(out, ".bss (runtime): {} bytes", image.bss_size);
    let _ = writeln!(out, "integrity check: OK");
    Ok(out)
}

fn chunk_line(out: &mut String, name: &str, range: Option<&Range<usize>>) {
    let _ = match range {
        Some(r) => writeln!(out, "{name}: [{}..{}) {} bytes", r.start, r.end, r.len()),
        None => writeln!(out, "{name}: none"),
    };
}
