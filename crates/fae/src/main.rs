//! FAE CLI - firmware image tools

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("fae=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let exit_code = commands::run_command(&cli);
    std::process::exit(exit_code);
}
