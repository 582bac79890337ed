//! Build command: assemble a FAE image from a partition ELF.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use fae::gdbinit::{self, GdbinitInput};
use fae::terminal::Spinner;
use fae::tools::{Crt0Builder, MakeCrt0Builder, ObjcopyExtractor, PartitionExtractor};
use fae::{ElfFile, Error, RelocationTable, Result, encode};
use fae_elf::EXPORTED_RELOCATION_SECTIONS;
use fae_format::FAE_EXTENSION;

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};

pub fn cmd_build(
    input: &Path,
    crt0_dir: &Path,
    flash_base: Option<u32>,
    ram_base: Option<u32>,
) -> i32 {
    info!("Building FAE image from {}", input.display());

    match build_image(
        input,
        crt0_dir,
        flash_base,
        ram_base,
        &MakeCrt0Builder,
        &ObjcopyExtractor,
    ) {
        Ok(output) => {
            info!("Wrote {}", output.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Build failed: {e}");
            EXIT_FAILURE
        }
    }
}

/// Derive the image path: `name.elf` becomes `name.fae` beside it.
fn output_path(input: &Path) -> Result<PathBuf> {
    match input.extension().and_then(|e| e.to_str()) {
        Some("elf") => Ok(input.with_extension(FAE_EXTENSION)),
        _ => Err(Error::BadInputName(input.to_path_buf())),
    }
}

fn build_image(
    input: &Path,
    crt0_dir: &Path,
    flash_base: Option<u32>,
    ram_base: Option<u32>,
    crt0_builder: &dyn Crt0Builder,
    extractor: &dyn PartitionExtractor,
) -> Result<PathBuf> {
    let output = output_path(input)?;

    let data = fs::read(input)?;
    let elf = ElfFile::parse(&data)?;
    let sizes = elf.section_sizes()?;

    let mut tables = Vec::with_capacity(EXPORTED_RELOCATION_SECTIONS.len());
    for section in EXPORTED_RELOCATION_SECTIONS {
        tables.push(elf.relocation_table(section)?);
    }

    let spinner = Spinner::new("Building CRT0 stub");
    let crt0 = match crt0_builder.build(crt0_dir) {
        Ok(bytes) => {
            spinner.finish_with_success(&format!("CRT0 stub: {} bytes", bytes.len()));
            bytes
        }
        Err(e) => {
            spinner.finish_with_failure("CRT0 build failed");
            return Err(e);
        }
    };

    let spinner = Spinner::new("Extracting partition bytes");
    let partition = match extractor.extract(input) {
        Ok(bytes) => {
            spinner.finish_with_success(&format!("Partition: {} bytes", bytes.len()));
            bytes
        }
        Err(e) => {
            spinner.finish_with_failure("Partition extraction failed");
            return Err(e);
        }
    };

    let image = encode(&crt0, &sizes, &tables, &partition)?;
    // Single write: no partial image is ever observable on disk.
    fs::write(&output, &image)?;

    let relocation_bytes: usize = tables.iter().map(RelocationTable::encoded_len).sum();
    let script = gdbinit::generate(&GdbinitInput {
        crt0_elf: &crt0_dir.join("build").join("crt0.elf"),
        partition_elf: input,
        crt0_size: crt0.len() as u32,
        relocation_bytes: relocation_bytes as u32,
        sizes,
        flash_base,
        ram_base,
    });
    fs::write(input.with_file_name("gdbinit"), script)?;

    Ok(output)
}
