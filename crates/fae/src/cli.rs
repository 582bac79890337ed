//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "fae")]
#[command(about = "FAE firmware image tools - build and inspect flash images for ARMv7-M targets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a FAE image (and gdbinit script) from a partition ELF
    Build {
        /// Input ELF file (name.elf; output lands beside it as name.fae)
        #[arg(value_name = "ELF")]
        input: PathBuf,

        /// Directory containing the CRT0 sources and Makefile
        #[arg(long, default_value = "./crt0/")]
        crt0_path: PathBuf,

        /// Flash base address for the gdbinit script (hex)
        #[arg(long, value_parser = parse_hex_addr)]
        flash_base: Option<u32>,

        /// RAM base address for the gdbinit script (hex)
        #[arg(long, value_parser = parse_hex_addr)]
        ram_base: Option<u32>,
    },
    /// Validate a FAE image and report its chunk layout
    Read {
        /// Input FAE file
        #[arg(value_name = "FAE")]
        input: PathBuf,

        #[command(flatten)]
        dump: DumpArgs,
    },
}

/// Independent presentation toggles for the read command.
#[derive(clap::Args, Clone, Copy, Debug)]
pub struct DumpArgs {
    /// Disassemble the CRT0 stub
    #[arg(long)]
    pub disasm_crt0: bool,

    /// Hex-dump the CRT0 stub
    #[arg(long)]
    pub dump_crt0: bool,

    /// Hex-dump the relocation entries
    #[arg(long)]
    pub dump_reloc: bool,

    /// Hex-dump the initialized-data region
    #[arg(long)]
    pub dump_data: bool,

    /// Disassemble the code region
    #[arg(long)]
    pub disasm_code: bool,

    /// Hex-dump the code region
    #[arg(long)]
    pub dump_code: bool,

    /// Hex-dump the GOT
    #[arg(long)]
    pub dump_got: bool,

    /// Enable all dump and disassembly options
    #[arg(short, long)]
    pub verbose: bool,
}

impl DumpArgs {
    /// Resolve the verbose shorthand into the individual toggles.
    #[must_use]
    pub const fn resolve(mut self) -> Self {
        if self.verbose {
            self.disasm_crt0 = true;
            self.dump_crt0 = true;
            self.dump_reloc = true;
            self.dump_data = true;
            self.disasm_code = true;
            self.dump_code = true;
            self.dump_got = true;
        }
        self
    }
}

/// Parse a hex address like `0x08000000`.
fn parse_hex_addr(arg: &str) -> Result<u32, String> {
    let digits = arg
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address: {e}"))
}
