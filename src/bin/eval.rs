//! Evaluation CLI: score the demo scenarios or a judgment file with MRR, NDCG@K and Recall@K.

use clap::{Parser, Subcommand};
use rankeval::{
    eval::{demo, load_queries, metrics::recall_at_ks},
    Config, EvalReport,
};
use std::path::PathBuf;

/// Retrieval evaluation: MRR, NDCG@K and Recall@K.
#[derive(Parser, Debug)]
#[command(name = "eval")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score the built-in demonstration scenarios (default).
    Demo,
    /// Score a JSON judgment file.
    Run {
        /// Path to the judgment file.
        #[arg(long, default_value = "eval_queries.json")]
        input: PathBuf,

        /// Cutoff for NDCG@K and Recall@K (default: eval.default_k).
        #[arg(long)]
        k: Option<usize>,

        /// Comma-separated cutoffs for the Recall@K sweep (default: eval.cutoffs).
        #[arg(long, value_delimiter = ',')]
        cutoffs: Vec<usize>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.rankeval.log_level.as_str()),
    )
    .init();

    match args.command.unwrap_or(Command::Demo) {
        Command::Demo => run_demo(&config),
        Command::Run {
            input,
            k,
            cutoffs,
            json,
        } => run_file(&config, input, k, cutoffs, json),
    }
}

fn run_demo(config: &Config) -> anyhow::Result<()> {
    let precision = config.report.precision;
    let scenarios = demo::scenarios()?;
    log::debug!("Running {} demo scenarios", scenarios.len());

    for scenario in &scenarios {
        let score = scenario.evaluate()?;
        println!(
            "{:<10} {:<34} {:.*}",
            scenario.metric.to_string(),
            scenario.name,
            precision,
            score
        );
    }

    let (queries, ks) = demo::recall_sweep()?;
    println!();
    for (k, recall) in recall_at_ks(&queries, &ks)? {
        println!("Average Recall@{}: {:.*}", k, precision, recall);
    }
    Ok(())
}

fn run_file(
    config: &Config,
    input: PathBuf,
    k: Option<usize>,
    cutoffs: Vec<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let queries = load_queries(&input)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", input.display(), e))?;
    if queries.is_empty() {
        log::warn!("No queries in {}; all scores are 0", input.display());
    }

    let k = k.unwrap_or(config.eval.default_k);
    let cutoffs = if cutoffs.is_empty() {
        config.eval.cutoffs.clone()
    } else {
        cutoffs
    };

    let report = EvalReport::evaluate(&queries, k, &cutoffs)?;
    if json || config.report.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render(config.report.precision));
    }

    let failures = report.failures(&config.thresholds, config.report.precision);
    if failures.is_empty() {
        return Ok(());
    }
    for failure in &failures {
        eprintln!("Below threshold: {}", failure);
    }
    std::process::exit(1);
}
