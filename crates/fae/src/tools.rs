//! External tool collaborators.
//!
//! Each subprocess step is behind a narrow trait so the build pipeline can
//! run against in-memory fakes in tests. All invocations are blocking with
//! no timeout; a non-zero exit aborts the whole operation.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::{Error, Result};

/// Cross-binutils prefix for the ARMv7-M target.
pub const BINUTILS_PREFIX: &str = "arm-none-eabi-";

/// Builds the CRT0 bootstrap stub and yields its raw bytes.
pub trait Crt0Builder {
    fn build(&self, crt0_dir: &Path) -> Result<Vec<u8>>;
}

/// Extracts the raw partition bytes (code + GOT + data, no BSS) from an ELF.
pub trait PartitionExtractor {
    fn extract(&self, elf_path: &Path) -> Result<Vec<u8>>;
}

/// Disassembles raw Thumb code for display.
pub trait Disassembler {
    fn disassemble(&self, bytes: &[u8]) -> Result<String>;
}

/// Run a command, mapping a non-zero exit to [`Error::Tool`].
fn run_tool(name: &str, command: &mut Command) -> Result<std::process::Output> {
    debug!(tool = name, "running external tool");
    let output = command.output()?;
    if !output.status.success() {
        return Err(Error::Tool {
            tool: name.to_string(),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(output)
}

/// Builds the CRT0 with `make -C <dir> realclean all`.
///
/// The Makefile leaves the raw stub at `<dir>/build/crt0.fae`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeCrt0Builder;

impl Crt0Builder for MakeCrt0Builder {
    fn build(&self, crt0_dir: &Path) -> Result<Vec<u8>> {
        run_tool(
            "make",
            Command::new("make")
                .arg("-C")
                .arg(crt0_dir)
                .arg("realclean")
                .arg("all"),
        )?;
        let stub = crt0_dir.join("build").join("crt0.fae");
        Ok(std::fs::read(stub)?)
    }
}

/// Extracts the partition with objcopy into a scratch file.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjcopyExtractor;

impl PartitionExtractor for ObjcopyExtractor {
    fn extract(&self, elf_path: &Path) -> Result<Vec<u8>> {
        let scratch = tempfile::tempdir()?;
        let partition = scratch.path().join("partition.fae");
        let objcopy = format!("{BINUTILS_PREFIX}objcopy");
        run_tool(
            &objcopy,
            Command::new(&objcopy)
                .arg("--input-target=elf32-littlearm")
                .arg("--output-target=binary")
                .arg(elf_path)
                .arg(&partition),
        )?;
        Ok(std::fs::read(partition)?)
    }
}

/// Disassembles raw bytes with objdump in forced-Thumb mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjdumpDisassembler;

impl Disassembler for ObjdumpDisassembler {
    fn disassemble(&self, bytes: &[u8]) -> Result<String> {
        let scratch = tempfile::tempdir()?;
        let raw = scratch.path().join("chunk.bin");
        std::fs::write(&raw, bytes)?;
        let objdump = format!("{BINUTILS_PREFIX}objdump");
        let output = run_tool(
            &objdump,
            Command::new(&objdump)
                .arg("-b")
                .arg("binary")
                .arg("-marm")
                .arg("--endian=little")
                .arg("-Mforce-thumb")
                .arg("-D")
                .arg(&raw),
        )?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
