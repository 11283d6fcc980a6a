use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsmith::cli::commands::{self, RunOverrides};
use docsmith::schema::BuilderStyle;

/// Parse builder style from string
fn parse_builder_style(s: &str) -> Result<BuilderStyle, String> {
    match s.to_lowercase().as_str() {
        "google" => Ok(BuilderStyle::Google),
        "numpy" => Ok(BuilderStyle::Numpy),
        _ => Err(format!("Invalid style '{}'. Valid values: google, numpy", s)),
    }
}

#[derive(Parser)]
#[command(name = "docsmith")]
#[command(
    version,
    about = "AI-assisted docstring insertion for Python source files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, default_value = ".docsmith/config.toml")]
    config: PathBuf,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert docstrings into the selected files
    Run {
        #[arg(long, short, help = "Glob pattern of files to include (repeatable)")]
        include: Vec<String>,
        #[arg(long, short, help = "Glob pattern of files to exclude (repeatable)")]
        exclude: Vec<String>,
        #[arg(long = "in-place", help = "Rewrite originals instead of modified_ copies")]
        inplace: bool,
        #[arg(long, help = "Skip files whose copy-mode output already exists")]
        skip_conflicts: bool,
        #[arg(long, short, help = "Bounded worker pool size")]
        workers: Option<usize>,
        #[arg(long, help = "Sampling temperature override (0.0-2.0)")]
        temperature: Option<f32>,
        #[arg(long, value_parser = parse_builder_style, help = "Docstring style: google, numpy")]
        style: Option<BuilderStyle>,
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Inspect or clear the generation cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show the effective merged configuration
    Config,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Drop every cached docstring
    Clear,
    /// Show entry count and store location
    Stats,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Run {
            include,
            exclude,
            inplace,
            skip_conflicts,
            workers,
            temperature,
            style,
            api_key,
        } => {
            let overrides = RunOverrides {
                include,
                exclude,
                inplace,
                skip_conflicts,
                workers,
                temperature,
                builder: style,
                api_key,
            };

            let rt = Runtime::new()?;
            let clean = rt.block_on(commands::run(&cli.config, overrides))?;
            Ok(clean)
        }
        Commands::Cache { action } => {
            match action {
                CacheAction::Clear => commands::cache_clear(&cli.config)?,
                CacheAction::Stats => commands::cache_stats(&cli.config)?,
            }
            Ok(true)
        }
        Commands::Config => {
            commands::config_show(&cli.config)?;
            Ok(true)
        }
    }
}
