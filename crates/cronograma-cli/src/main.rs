//! cronograma CLI - Schedule Analytics Engine
//!
//! Command-line interface for deriving dashboard, calendar, and executive
//! summary views from a project/task snapshot.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cronograma_analytics::{build_executive_summary, compute_dashboard, expand_by_day};
use cronograma_core::Snapshot;

mod report;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "cronograma")]
#[command(author, version, about = "Schedule analytics engine", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Evaluation date (defaults to the local calendar day)
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive dashboard metrics from a snapshot
    Dashboard {
        /// Snapshot JSON file
        #[arg(value_name = "FILE")]
        file: std::path::PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Derive the executive summary from a snapshot
    Summary {
        /// Snapshot JSON file
        #[arg(value_name = "FILE")]
        file: std::path::PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Expand tasks into per-day calendar buckets
    Calendar {
        /// Snapshot JSON file
        #[arg(value_name = "FILE")]
        file: std::path::PathBuf,

        /// First day to print (defaults to the earliest expanded day)
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,

        /// Last day to print (defaults to the latest expanded day)
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<NaiveDate>,
    },

    /// Validate a snapshot and report data-quality warnings
    Check {
        /// Snapshot JSON file
        #[arg(value_name = "FILE")]
        file: std::path::PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match cli.command {
        Some(Commands::Dashboard { file, format }) => {
            let snapshot = load(&file)?;
            let metrics = compute_dashboard(&snapshot.projects, &snapshot.tasks, today);
            match format {
                OutputFormat::Text => print!("{}", report::render_dashboard(&metrics, today)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
            }
        }
        Some(Commands::Summary { file, format }) => {
            let snapshot = load(&file)?;
            let summary = build_executive_summary(&snapshot.projects, &snapshot.tasks, today);
            match format {
                OutputFormat::Text => print!("{}", report::render_summary(&summary, today)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
        }
        Some(Commands::Calendar { file, from, to }) => {
            let snapshot = load(&file)?;
            let days = expand_by_day(&snapshot.tasks);
            print!("{}", report::render_calendar(&days, &snapshot.tasks, from, to));
        }
        Some(Commands::Check { file }) => {
            let snapshot = load(&file)?;
            print!("{}", report::render_check(&snapshot));
            if !snapshot.warnings.is_empty() {
                std::process::exit(1);
            }
        }
        None => {
            println!("cronograma - Schedule Analytics Engine");
            println!("Run with --help for usage information");
        }
    }

    Ok(())
}

fn load(path: &std::path::Path) -> Result<Snapshot> {
    tracing::debug!(path = %path.display(), "loading snapshot");
    let snapshot = Snapshot::load(path)
        .with_context(|| format!("failed to load snapshot from {}", path.display()))?;
    tracing::debug!(
        projects = snapshot.projects.len(),
        tasks = snapshot.tasks.len(),
        warnings = snapshot.warnings.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
