//! Descriptor fitting CLI.
//!
//! Loads areas, runs the search until interrupted (Ctrl-C) or until the
//! iteration budget runs out, then writes the snapshot.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use u_descriptors::compare::Metric;
use u_descriptors::io::{load_areas, ProgressLog, Snapshot};
use u_descriptors::model::Atlas;
use u_descriptors::search::{Acceptance, SearchConfig, SearchRunner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AcceptanceArg {
    Greedy,
    Metropolis,
}

impl From<AcceptanceArg> for Acceptance {
    fn from(arg: AcceptanceArg) -> Self {
        match arg {
            AcceptanceArg::Greedy => Acceptance::Greedy,
            AcceptanceArg::Metropolis => Acceptance::Metropolis,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "u-descriptors", version, about = "Fit additive descriptors to area demographics")]
struct Cli {
    /// Areas JSON produced by the ingestion pipeline.
    areas: PathBuf,

    /// Directory for the progress log and snapshot.
    #[arg(short, long, default_value = "logs")]
    out_dir: PathBuf,

    /// Optional JSON file with a full search configuration; flags below
    /// override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total descriptor count, nation and state descriptors included.
    #[arg(long)]
    max_descriptors: Option<usize>,

    /// Largest change one reweight may apply.
    #[arg(long)]
    max_perturbation: Option<f64>,

    /// Comparison metric: l1, l2, cosine or js.
    #[arg(long)]
    metric: Option<Metric>,

    #[arg(long, value_enum)]
    acceptance: Option<AcceptanceArg>,

    /// Temperature for metropolis acceptance.
    #[arg(long)]
    temperature: Option<f64>,

    /// Never reweight nation/state descriptors.
    #[arg(long)]
    freeze_fixed: bool,

    /// Stop after this many iterations (0 runs until interrupted).
    #[arg(long)]
    max_iterations: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Rescore areas in parallel (needs the `parallel` feature).
    #[arg(long)]
    parallel: bool,
}

impl Cli {
    fn search_config(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SearchConfig::default(),
        };
        if let Some(n) = self.max_descriptors {
            config = config.with_max_descriptors(n);
        }
        if let Some(delta) = self.max_perturbation {
            config = config.with_max_perturbation(delta);
        }
        if let Some(metric) = self.metric {
            config = config.with_metric(metric);
        }
        if let Some(acceptance) = self.acceptance {
            config = config.with_acceptance(acceptance.into());
        }
        if let Some(t) = self.temperature {
            config = config.with_temperature(t);
        }
        if self.freeze_fixed {
            config = config.with_reweight_fixed(false);
        }
        if let Some(n) = self.max_iterations {
            config = config.with_max_iterations(n);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.parallel {
            config = config.with_parallel(true);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.search_config()?;

    let areas = load_areas(&cli.areas)
        .with_context(|| format!("loading areas from {}", cli.areas.display()))?;
    let mut atlas = Atlas::initialize(areas, config.metric, config.max_descriptors)
        .with_parallel(config.parallel);

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    let mut progress = ProgressLog::create(cli.out_dir.join("times.csv"))?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("installing interrupt handler")?;

    let result = SearchRunner::run_with_cancel(&mut atlas, &config, &mut progress, Some(cancel))?;

    let snapshot = Snapshot::capture(&atlas);
    snapshot.write_text(cli.out_dir.join("log.out"))?;
    snapshot.write_json(cli.out_dir.join("snapshot.json"))?;
    info!(
        "wrote snapshot to {} ({} progress rows)",
        cli.out_dir.display(),
        progress.rows()
    );

    println!(
        "{} iterations, score {:.6} -> {:.6}{}",
        result.iterations,
        result.initial_score,
        result.final_score,
        if result.cancelled { " (interrupted)" } else { "" }
    );
    Ok(())
}
