// src/main.rs — Strategos entry point

use clap::Parser;

use strategos::cli::{Cli, Commands};
use strategos::infra::config::Config;
use strategos::infra::logger;

#[tokio::main]
async fn main() {
    // Respects RUST_LOG
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Commands::Init { force } => strategos::cli::init::run_init(force),
        Commands::Run {
            population,
            save,
            max_iterations,
            quiet,
        } => {
            strategos::cli::run::run_population(
                &population,
                save.as_deref(),
                max_iterations,
                &config,
                quiet,
            )
            .await
        }
    }
}
