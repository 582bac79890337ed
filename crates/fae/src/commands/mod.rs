//! Command implementations.
//!
//! Each submodule handles a specific CLI command.

mod build;
mod read;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Build { .. } => handle_build(cli),
        Commands::Read { .. } => handle_read(cli),
    }
}

fn handle_build(cli: &Cli) -> i32 {
    let Commands::Build {
        input,
        crt0_path,
        flash_base,
        ram_base,
    } = &cli.command
    else {
        unreachable!("build command variant mismatch");
    };

    build::cmd_build(input, crt0_path, *flash_base, *ram_base)
}

fn handle_read(cli: &Cli) -> i32 {
    let Commands::Read { input, dump } = &cli.command else {
        unreachable!("read command variant mismatch");
    };

    read::cmd_read(input, *dump)
}
