//! CLI command definitions for trade-forge.
//!
//! Every command works on local files; `serve` starts the HTTP API.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::categories::Category;
use crate::config::ForgeConfig;
use crate::dataset::{CategoryWeights, DatasetAssembler, DatasetStats, TrainingExample};
use crate::export;
use crate::generator::SampleGenerator;
use crate::ohlc::{OhlcPattern, OhlcSynthesizer};
use crate::template::TemplateBank;
use crate::validation;

/// Number of line errors printed in human-readable validation output.
const PRINTED_ERRORS: usize = 10;

/// Seeded synthetic trading instruction/response dataset generator.
#[derive(Parser)]
#[command(name = "trade-forge")]
#[command(about = "Generate seeded synthetic trading datasets for LLM fine-tuning")]
#[command(version)]
#[command(
    long_about = "trade-forge generates instruction/response pairs covering PineScript strategies, price action and institutional flow.\n\nDatasets are written as JSONL, one record per line.\n\nExample usage:\n  trade-forge generate --size 1000 --seed 42 --balance --output datasets/train.jsonl"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate a dataset and write it as JSONL.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Print one sample for a category.
    Preview(PreviewArgs),

    /// Print a synthetic OHLC bar sequence.
    Ohlc(OhlcArgs),

    /// Validate every line of a dataset file.
    Validate(ValidateArgs),

    /// Show pattern and timeframe distribution of a dataset file.
    Stats(StatsArgs),

    /// List dataset files in the datasets directory.
    List(ListArgs),

    /// Serve the HTTP API.
    Serve(ServeArgs),
}

/// Arguments for `trade-forge generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Number of samples to generate.
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Top-level seed; 0 or absent draws one from entropy.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Split categories into equal thirds.
    #[arg(long)]
    pub balance: bool,

    /// PineScript share in percent (ignored with --balance).
    #[arg(long, default_value = "30")]
    pub pine_weight: u32,

    /// Price action share in percent (ignored with --balance).
    #[arg(long, default_value = "40")]
    pub price_weight: u32,

    /// Institutional flow share in percent (ignored with --balance).
    #[arg(long, default_value = "30")]
    pub inst_weight: u32,

    /// Output file path. Defaults to a timestamped file in the datasets directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output JSON summary to stdout.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `trade-forge preview`.
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Category: pinescript, price_action or institutional.
    pub category: String,

    /// Seed for reproducible output.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for `trade-forge ohlc`.
#[derive(Parser, Debug)]
pub struct OhlcArgs {
    /// Pattern name; unknown names fall back to a random walk.
    #[arg(short, long, default_value = "breakout")]
    pub pattern: String,

    /// Number of bars.
    #[arg(short, long, default_value = "10")]
    pub bars: usize,

    /// Seed for reproducible output.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for `trade-forge validate`.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Dataset file to validate.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output the full JSON report.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `trade-forge stats`.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Dataset file to summarize.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output JSON to stdout.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `trade-forge list`.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Directory to list. Defaults to the configured datasets directory.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for `trade-forge serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind. Defaults to the configured bind address.
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Directory holding dataset files.
    #[arg(short, long)]
    pub datasets_dir: Option<PathBuf>,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let config = ForgeConfig::from_env()?;

    match cli.command {
        Commands::Generate(args) => run_generate_command(args, &config),
        Commands::Preview(args) => run_preview_command(args),
        Commands::Ohlc(args) => run_ohlc_command(args, &config),
        Commands::Validate(args) => run_validate_command(args, &config),
        Commands::Stats(args) => run_stats_command(args),
        Commands::List(args) => run_list_command(args, &config),
        Commands::Serve(args) => run_serve_command(args, config).await,
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateOutput {
    status: String,
    samples_generated: usize,
    output: String,
    seed_used: u64,
    distribution: std::collections::BTreeMap<String, usize>,
}

fn run_generate_command(args: GenerateArgs, config: &ForgeConfig) -> anyhow::Result<()> {
    let size = args.size.unwrap_or(config.default_size);
    if size == 0 {
        anyhow::bail!("--size must be positive");
    }

    let output = args
        .output
        .unwrap_or_else(|| config.datasets_dir.join(export::default_filename()));
    let weights = CategoryWeights::from_request(
        args.balance,
        args.pine_weight,
        args.price_weight,
        args.inst_weight,
    );

    info!(size, output = %output.display(), "Generating dataset");

    let bank = TemplateBank::load()?;
    let dataset = DatasetAssembler::new(&bank)
        .with_max_records(config.max_dataset_size)
        .assemble(size, &weights, args.seed)?;
    let written = export::write_jsonl(&output, &dataset.records)?;

    let summary = GenerateOutput {
        status: "success".to_string(),
        samples_generated: written,
        output: output.display().to_string(),
        seed_used: dataset.seed_used,
        distribution: dataset.distribution_by_name(),
    };

    if args.json {
        let json_output = serde_json::to_string_pretty(&summary)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("✓ Generated {} samples → {}", written, summary.output);
    println!("  Seed: {}", summary.seed_used);
    for (category, count) in &dataset.distribution {
        println!("  {}: {}", category.display_name(), count);
    }
    Ok(())
}

fn run_preview_command(args: PreviewArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    let bank = TemplateBank::load()?;
    let (sample, seed) = SampleGenerator::new(&bank).preview(category, args.seed)?;

    let mut value = serde_json::to_value(&sample)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("seed".to_string(), seed.into());
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn run_ohlc_command(args: OhlcArgs, config: &ForgeConfig) -> anyhow::Result<()> {
    if args.bars > config.max_ohlc_bars {
        anyhow::bail!(
            "--bars {} exceeds the limit of {}",
            args.bars,
            config.max_ohlc_bars
        );
    }
    let pattern = OhlcPattern::from_name(&args.pattern);
    let bars = OhlcSynthesizer::new(config.ohlc_interval_minutes).generate(
        pattern,
        args.bars,
        args.seed,
    );

    let output = serde_json::json!({
        "pattern": args.pattern,
        "bars": bars,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_validate_command(args: ValidateArgs, config: &ForgeConfig) -> anyhow::Result<()> {
    let report = validation::validate_file(&args.input, config.max_reported_errors)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.valid {
        println!("✓ All {} samples valid!", report.valid_count);
        return Ok(());
    }

    println!(
        "✗ Found {} invalid of {} samples:",
        report.error_count,
        report.total()
    );
    for err in report.errors.iter().take(PRINTED_ERRORS) {
        match &err.field {
            Some(field) => println!("  Line {}: {}: {}", err.line, field, err.reason),
            None => println!("  Line {}: {}", err.line, err.reason),
        }
    }
    Ok(())
}

fn run_stats_command(args: StatsArgs) -> anyhow::Result<()> {
    let records: Vec<TrainingExample> = export::read_jsonl(&args.input)?;
    let stats = DatasetStats::compute(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_stats(&args.input, &stats);
    Ok(())
}

fn print_stats(input: &Path, stats: &DatasetStats) {
    println!("Dataset Statistics for {}", input.display());
    println!("  Total samples: {}", stats.total);
    println!();
    println!("  Pattern distribution:");
    for p in &stats.patterns {
        println!("    {}: {} ({:.1}%)", p.name, p.count, p.percent);
    }
    if !stats.timeframes.is_empty() {
        println!();
        println!("  Timeframe distribution:");
        for tf in &stats.timeframes {
            println!("    {}: {}", tf.name, tf.count);
        }
    }
}

fn run_list_command(args: ListArgs, config: &ForgeConfig) -> anyhow::Result<()> {
    let dir = args.dir.unwrap_or_else(|| config.datasets_dir.clone());
    let datasets = export::list_datasets(&dir)?;
    let output = serde_json::json!({ "datasets": datasets });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_serve_command(args: ServeArgs, mut config: ForgeConfig) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config = config.with_bind_addr(bind);
    }
    if let Some(dir) = args.datasets_dir {
        config = config.with_datasets_dir(dir);
    }
    crate::api::serve(config).await
}
