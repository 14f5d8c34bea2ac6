use anyhow::{Context, Result};
use candidates::{write_split, SplitStrategy};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Snapshot;
use evaluation::{
    EvaluationConfig, EvaluationDriver, EvaluationReport, ResultFormat, ResultStore, ResultTable,
};
use scorers::{FittedModel, Scorer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// hawker-eval - offline evaluation of hawker stall recommenders
#[derive(Parser)]
#[command(name = "hawker-eval")]
#[command(about = "Offline ranking evaluation for hawker stall recommenders", long_about = None)]
struct Cli {
    /// Snapshot directory holding stalls and reviews (CSV or JSON)
    #[arg(short, long, default_value = "data/snapshot")]
    data_dir: PathBuf,

    /// JSON evaluation config; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the positive rating threshold
    #[arg(long)]
    min_rating: Option<f32>,

    /// Override the positive interactions a user needs
    #[arg(long)]
    min_interactions: Option<usize>,

    /// Keep stalls on the non-food keyword list
    #[arg(long)]
    keep_non_food: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate fitted models and store their result tables
    Evaluate {
        /// Fitted model artifact (repeat for several models)
        #[arg(long = "model", required = true)]
        models: Vec<PathBuf>,

        /// Directory the result tables are written to
        #[arg(long, default_value = "results")]
        out: PathBuf,

        /// Result table format: csv or json
        #[arg(long, default_value = "csv")]
        format: ResultFormat,

        /// Override the sampling seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the split strategy: chronological or shuffled
        #[arg(long)]
        split: Option<SplitStrategy>,
    },

    /// Write the train/test split so a trainer can fit on the train half
    Split {
        /// Output directory for train.csv and test.csv
        #[arg(long, default_value = "split")]
        out: PathBuf,

        /// Override the split strategy: chronological or shuffled
        #[arg(long)]
        split: Option<SplitStrategy>,
    },

    /// Show load counts, filter stages and eligible users
    Summary {
        /// Also print the load report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EvaluationConfig::load_from_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => EvaluationConfig::default(),
    };
    if let Some(min_rating) = cli.min_rating {
        config = config.with_min_rating(min_rating);
    }
    if let Some(min_interactions) = cli.min_interactions {
        config = config.with_min_interactions(min_interactions);
    }
    if cli.keep_non_food {
        let load = config.load.clone().with_exclude_non_food(false);
        config = config.with_load_options(load);
    }

    // Load snapshot
    println!("Loading snapshot from {}...", cli.data_dir.display());
    let start = Instant::now();
    let snapshot = Snapshot::load_from_files(&cli.data_dir, &config.load)
        .context("Failed to load snapshot")?;
    let (stalls, interactions) = snapshot.counts();
    println!(
        "{} Loaded {} stalls and {} interactions in {:?}",
        "✓".green(),
        stalls,
        interactions,
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Evaluate {
            models,
            out,
            format,
            seed,
            split,
        } => {
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(split) = split {
                config = config.with_split(split);
            }
            handle_evaluate(&snapshot, config, &models, &out, format)?
        }
        Commands::Split { out, split } => {
            if let Some(split) = split {
                config = config.with_split(split);
            }
            handle_split(&snapshot, config, &out)?
        }
        Commands::Summary { json } => handle_summary(&snapshot, config, json)?,
    }

    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(
    snapshot: &Snapshot,
    config: EvaluationConfig,
    models: &[PathBuf],
    out: &Path,
    format: ResultFormat,
) -> Result<()> {
    config.validate().context("Invalid evaluation config")?;

    // Load every artifact before evaluating so a bad one fails fast
    let models = models
        .iter()
        .map(|path| {
            FittedModel::load_from_path(path)
                .with_context(|| format!("Failed to load model {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    ensure_unique_names(&models)?;

    let store = ResultStore::open(out, format).context("Failed to open result directory")?;
    let driver = EvaluationDriver::new(config);

    // The split does not depend on the model, so prepare once
    let prepared = driver
        .prepare(snapshot)
        .context("Failed to prepare interactions")?;

    for model in &models {
        info!("Evaluating model {} ({})", model.name(), model.kind());
        let report = driver
            .run_prepared(snapshot, &prepared, model)
            .with_context(|| format!("Evaluation of {} failed", model.name()))?;

        print_report(&report);

        let stored = store
            .write_report(&report)
            .with_context(|| format!("Failed to store results for {}", model.name()))?;
        println!(
            "{} Wrote {} and {}\n",
            "✓".green(),
            stored.hit_rate.display(),
            stored.metrics.display()
        );
    }
    Ok(())
}

/// Result files are named after the model, so names must not collide
fn ensure_unique_names(models: &[FittedModel]) -> Result<()> {
    let mut seen = HashSet::new();
    for model in models {
        if !seen.insert(model.name()) {
            anyhow::bail!(
                "Two models are named '{}'; set a distinct \"name\" in each artifact",
                model.name()
            );
        }
    }
    Ok(())
}

/// Handle the 'split' command
fn handle_split(snapshot: &Snapshot, config: EvaluationConfig, out: &Path) -> Result<()> {
    let split_strategy = config.split;
    let driver = EvaluationDriver::new(config);
    let prepared = driver
        .prepare(snapshot)
        .context("Failed to prepare interactions")?;

    let files = write_split(&prepared.split, out)?;
    println!(
        "{} Wrote {} split of {} users to {} and {}",
        "✓".green(),
        split_strategy,
        prepared.eligible_users(),
        files.train.display(),
        files.test.display()
    );
    Ok(())
}

/// Handle the 'summary' command
fn handle_summary(snapshot: &Snapshot, config: EvaluationConfig, json: bool) -> Result<()> {
    let report = *snapshot.report();

    println!("{}", "Snapshot".bold().blue());
    println!("{}Stalls read: {}", "• ".green(), report.stalls_read);
    println!("{}Non-food stalls excluded: {}", "• ".green(), report.stalls_non_food);
    println!("{}Unrated stalls excluded: {}", "• ".green(), report.stalls_unrated);
    println!("{}Repeated stall rows ignored: {}", "• ".green(), report.stalls_duplicate);
    println!("{}Catalog size: {}", "• ".green(), snapshot.counts().0);
    println!("{}Reviews read: {}", "• ".cyan(), report.reviews_read);
    println!("{}Reviews without rating: {}", "• ".cyan(), report.reviews_missing_rating);

    let driver = EvaluationDriver::new(config);
    let prepared = driver
        .prepare(snapshot)
        .context("Failed to prepare interactions")?;

    println!("{}", "Filters".bold().blue());
    for stage in &prepared.stages {
        println!(
            "  - {}: {} -> {}",
            stage.name, stage.input, stage.output
        );
    }

    let split = &prepared.split;
    println!("{}", "Split".bold().blue());
    println!("{}Eligible users: {}", "• ".green(), split.len());
    println!("{}Users with a test half: {}", "• ".green(), split.users_with_test());
    println!(
        "{}Train / test interactions: {} / {}",
        "• ".green(),
        split.train_interactions().count(),
        split.test_interactions().count()
    );

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to encode load report")?;
        println!("{}", text);
    }
    Ok(())
}

/// Print both result tables of one report
fn print_report(report: &EvaluationReport) {
    let summary = &report.summary;
    println!(
        "\n{} {}",
        "Model".bold().blue(),
        summary.model.bold()
    );
    println!(
        "{}Universe {} of {} catalog stalls; {} of {} users evaluated ({} unknown, {} without scorable test items)",
        "• ".green(),
        summary.universe_size,
        summary.catalog_size,
        summary.users_evaluated,
        summary.eligible_users,
        summary.users_unknown,
        summary.users_without_test
    );
    print_table(&report.hit_rate);
    print_table(&report.metrics);
}

fn print_table<T: ResultTable>(table: &T) {
    let columns = table.columns();
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| evaluation::tables::format_cell(cell, Some(4)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:>width$}", column, width = width))
        .collect();
    println!("\n{}", header.join("  ").bold());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                if cell.is_empty() {
                    format!("{:>width$}", "-", width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect();
        println!("{}", line.join("  "));
    }
}
