// src/cli/run.rs — Drive a population to convergence

use std::io::Write;
use std::path::Path;

use crate::engine::types::{CycleReport, EvolutionConfig, EvolutionState};
use crate::engine::{ConvergenceDecision, IterationCoordinator};
use crate::infra::config::Config;
use crate::infra::paths;
use crate::provider;

/// Load a snapshot, run cycles until the engine says stop, and report.
///
/// Generation and evaluation of strategies live outside this binary; a run
/// re-scores budget and diversity over whatever fitness the snapshot
/// carries, which is exactly the engine's contract.
pub async fn run_population(
    population_path: &Path,
    save_path: Option<&Path>,
    max_iterations_override: Option<u32>,
    config: &Config,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut candidates = super::population::load(population_path)?;
    tracing::info!(
        "Loaded {} candidates from {}",
        candidates.len(),
        population_path.display()
    );

    let mut engine_config: EvolutionConfig = (&config.engine).into();
    if let Some(n) = max_iterations_override {
        engine_config.max_iterations = n;
    }

    let provider = provider::from_config(&config.embedder)?;
    let coordinator = IterationCoordinator::new(provider);
    let mut state = EvolutionState::new(engine_config)?;

    let mut history = HistoryWriter::open(config)?;

    loop {
        let report = coordinator.run_cycle(&mut candidates, &mut state).await?;
        history.append(&report)?;

        if !quiet {
            print_cycle(&report);
        }

        if let ConvergenceDecision::Stop(reason) = report.convergence {
            println!(
                "Stopped after {} iteration(s): {}",
                report.iteration,
                serde_json::to_value(reason)?.as_str().unwrap_or("unknown")
            );
            break;
        }
    }

    print_summary(&candidates);

    if let Some(path) = save_path {
        super::population::save(path, &candidates)?;
        println!("Saved annotated population to {}", path.display());
    }
    Ok(())
}

fn print_cycle(report: &CycleReport) {
    println!(
        "cycle {:>3}  entropy {:>8.4}  T {:>6.3}  active {:>3}  quota {:>3}{}",
        report.iteration,
        report.spatial_entropy,
        report.normalized_temperature,
        report.active_candidates,
        report.quota_total,
        if report.embedding_failures > 0 {
            format!("  ({} unembedded)", report.embedding_failures)
        } else {
            String::new()
        }
    );
}

fn print_summary(candidates: &[crate::engine::Candidate]) {
    let mut ranked: Vec<_> = candidates.iter().filter(|c| c.active).collect();
    ranked.sort_by(|a, b| {
        b.composite_score
            .unwrap_or(0.0)
            .partial_cmp(&a.composite_score.unwrap_or(0.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!("\n  quota  fitness  composite  strategy");
    for c in ranked {
        let text: String = c.text.chars().take(60).collect();
        println!(
            "  {:>5}  {:>7.3}  {:>9.3}  {}",
            c.expansion_quota.unwrap_or(0),
            c.fitness_score,
            c.composite_score.unwrap_or(0.0),
            text
        );
    }
}

/// Appends one JSON line per cycle to the configured history file.
struct HistoryWriter {
    file: Option<std::fs::File>,
}

impl HistoryWriter {
    fn open(config: &Config) -> anyhow::Result<Self> {
        let Some(name) = &config.run.history_file else {
            return Ok(Self { file: None });
        };
        let dir = paths::runs_dir();
        std::fs::create_dir_all(&dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(name))?;
        Ok(Self { file: Some(file) })
    }

    fn append(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        if let Some(file) = &mut self.file {
            let line = serde_json::to_string(report)?;
            writeln!(file, "{line}")?;
        }
        Ok(())
    }
}
