// crates/ledgerlens/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ledgerlens_core::{run_pipeline, PipelineConfig, SystemClock, TracingObserver};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod output;

/// Environment variable naming a TOML config file, used when `--config` is absent.
const CONFIG_ENV: &str = "LEDGERLENS_CONFIG";

#[derive(Parser, Debug)]
#[command(author, version, about = "Cleans, joins and segments a transaction ledger", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Json, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, clean and transform both sources, writing stage snapshots
    Run(RunArgs),
    /// Print the effective configuration as TOML
    ShowConfig(ConfigArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transaction ledger CSV
    #[arg(long)]
    transactions: Option<PathBuf>,

    /// Customer profile JSON
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Directory receiving extracted/, cleaned/ and transformed/ snapshots
    #[arg(long)]
    snapshot_root: Option<PathBuf>,

    /// Skip writing parquet snapshots
    #[arg(long)]
    no_snapshots: bool,

    /// Upper bound of the Low segment
    #[arg(long)]
    low: Option<f64>,

    /// Upper bound of the Medium segment
    #[arg(long)]
    high: Option<f64>,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Print the run summary as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match cli.command {
        Command::Run(args) => {
            let config = resolve_config(&args.config)?;
            info!(
                transactions = %config.transactions_path.display(),
                profiles = %config.profiles_path.display(),
                snapshots = config.snapshots,
                "starting pipeline"
            );

            let output = run_pipeline(&config, &SystemClock, &TracingObserver)
                .context("pipeline run failed")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&output.summary)?);
            } else {
                output::print_summary(&output.summary);
            }
            Ok(())
        }
        Command::ShowConfig(args) => {
            let config = resolve_config(&args)?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn resolve_config(args: &ConfigArgs) -> Result<PipelineConfig> {
    resolve_config_from(args, std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// Loads the config file (flag first, then environment) and applies command-line overrides.
fn resolve_config_from(args: &ConfigArgs, env_path: Option<PathBuf>) -> Result<PipelineConfig> {
    let mut config = match args.config.clone().or(env_path) {
        Some(path) => PipelineConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(path) = &args.transactions {
        config.transactions_path = path.clone();
    }
    if let Some(path) = &args.profiles {
        config.profiles_path = path.clone();
    }
    if let Some(path) = &args.snapshot_root {
        config.snapshot_root = path.clone();
    }
    if args.no_snapshots {
        config.snapshots = false;
    }
    if let Some(low) = args.low {
        config.segmentation.low = low;
    }
    if let Some(high) = args.high {
        config.segmentation.high = high;
    }

    config.validate().context("invalid segment thresholds")?;
    Ok(config)
}
