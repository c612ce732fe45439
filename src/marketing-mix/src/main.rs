//! Marketing Mix: synthetic weekly marketing data and log-log regression
//! analysis of channel effectiveness.
//!
//! Entry point: loads configuration, applies CLI overrides, and runs the
//! generator and/or analyzer stages.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mmm_core::{AppConfig, MarketingDataset, ModelConfig};
use mmm_generator::SeriesGenerator;
use mmm_reporting::{run_analysis, ResultsWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "marketing-mix")]
#[command(about = "Synthetic marketing mix data generation and regression analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Random seed (overrides config)
    #[arg(long, global = true, env = "MARKETING_MIX__GENERATOR__SEED")]
    seed: Option<u64>,

    /// Number of weeks to generate (overrides config)
    #[arg(long, global = true, env = "MARKETING_MIX__GENERATOR__N_WEEKS")]
    weeks: Option<usize>,

    /// Weekly dataset CSV path (overrides config)
    #[arg(long, global = true, env = "MARKETING_MIX__OUTPUT__DATA_PATH")]
    data: Option<PathBuf>,

    /// Directory for result tables (overrides config)
    #[arg(long, global = true, env = "MARKETING_MIX__OUTPUT__RESULTS_DIR")]
    results_dir: Option<PathBuf>,

    /// Directory for chart data (overrides config)
    #[arg(long, global = true, env = "MARKETING_MIX__OUTPUT__CHARTS_DIR")]
    charts_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Generate the synthetic weekly dataset
    Generate,
    /// Analyze an existing weekly dataset
    Analyze,
    /// Generate, then analyze the written file
    Run,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "marketing_mix=info,mmm_generator=info,mmm_reporting=info,mmm_regression=info"
                    .into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(seed) = cli.seed {
        config.generator.seed = seed;
    }
    if let Some(weeks) = cli.weeks {
        config.generator.n_weeks = weeks;
    }
    if let Some(data) = cli.data {
        config.output.data_path = data;
    }
    if let Some(dir) = cli.results_dir {
        config.output.results_dir = dir;
    }
    if let Some(dir) = cli.charts_dir {
        config.output.charts_dir = dir;
    }

    info!(
        command = ?cli.command,
        seed = config.generator.seed,
        weeks = config.generator.n_weeks,
        data = %config.output.data_path.display(),
        results_dir = %config.output.results_dir.display(),
        charts_dir = %config.output.charts_dir.display(),
        "Configuration loaded"
    );

    let model = ModelConfig::default();
    match cli.command {
        Commands::Generate => generate(&config, &model),
        Commands::Analyze => analyze(&config, &model),
        Commands::Run => {
            generate(&config, &model)?;
            analyze(&config, &model)
        }
    }
}

fn generate(config: &AppConfig, model: &ModelConfig) -> anyhow::Result<()> {
    let dataset = SeriesGenerator::new(model, config.generator.seed, config.generator.n_weeks)
        .generate()
        .context("data generation failed")?;
    dataset
        .write_csv(&config.output.data_path)
        .with_context(|| format!("writing {}", config.output.data_path.display()))?;
    Ok(())
}

fn analyze(config: &AppConfig, model: &ModelConfig) -> anyhow::Result<()> {
    let path = &config.output.data_path;
    let dataset = MarketingDataset::read_csv(path)
        .with_context(|| format!("loading {}", path.display()))?;
    let report = run_analysis(model, &dataset).context("analysis failed")?;

    let writer = ResultsWriter::new(&config.output.results_dir, &config.output.charts_dir);
    let written = writer
        .write_all(&dataset, &report)
        .context("writing analysis outputs")?;
    for path in &written {
        info!(path = %path.display(), "Created");
    }
    info!("Analysis complete");
    Ok(())
}
