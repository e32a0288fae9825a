//! Root CLI structure for eqwow-convert

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eqwow-convert")]
#[command(about = "Write WoW M2 models and WMO zones from converted asset descriptions", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (JSON or YAML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write M2 models and their skin files
    M2 {
        /// Model description files
        #[arg(required = true, value_name = "MODEL")]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write a WMO root file and its group files
    Wmo {
        /// Zone description file
        #[arg(value_name = "ZONE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    /// Log filter for the `-v`/`-q` flags
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose > 0 {
            match self.verbose {
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Warn
        }
    }
}
