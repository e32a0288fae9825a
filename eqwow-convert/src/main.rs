//! Main entry point for the eqwow-convert CLI

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;

use eqwow_convert::cli::{Cli, Commands};
use eqwow_convert::commands;
use eqwow_convert::config::ConvertConfig;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still overrides the flags
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level().as_str()),
    )
    .init();

    let config = ConvertConfig::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::M2 { inputs, output } => {
            commands::m2::execute(&inputs, &output, &config, cli.quiet)?;
            Ok(())
        }
        Commands::Wmo { input, output } => {
            commands::wmo::execute(&input, &output, &config)?;
            Ok(())
        }
        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
