// src/cli/mod.rs — CLI definition (clap derive)

pub mod init;
pub mod population;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "strategos",
    about = "Evolutionary selection over embedded strategy hypotheses",
    version
)]
pub struct Cli {
    /// Config file path (default: ~/.strategos/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Evolve a scored population snapshot until convergence
    Run {
        /// Population snapshot (JSON array of candidates)
        #[arg(short, long)]
        population: PathBuf,

        /// Write the annotated population back to this path on completion
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Override [engine] max_iterations
        #[arg(long)]
        max_iterations: Option<u32>,

        /// Suppress per-cycle output (only emit the final summary)
        #[arg(long)]
        quiet: bool,
    },
}
