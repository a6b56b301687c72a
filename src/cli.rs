//! Command-line interface for animscan.

use clap::{ArgGroup, Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::manifest::VersionManifest;
use crate::pipeline::{self, BatchReport, Pipeline};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Static analysis of animation example projects.
///
/// Extracts per-project metadata (packages, hooks, functions, components,
/// patterns) from a corpus of JS/TS projects and aggregates it into
/// corpus-wide statistics.
#[derive(Parser)]
#[command(name = "animscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
pub struct GlobalArgs {
    /// Corpus directory with one subdirectory per project
    #[arg(long, global = true, default_value = "data/animations")]
    pub corpus: PathBuf,

    /// Directory holding per-project metadata documents
    #[arg(long, global = true, default_value = "data/metadata")]
    pub metadata_dir: PathBuf,

    /// Path of the aggregate statistics document
    #[arg(long, global = true, default_value = "data/stats.json")]
    pub stats_output: PathBuf,

    /// package.json-style manifest used for packages_with_versions
    #[arg(long, global = true)]
    pub versions: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract metadata for one project or the whole corpus
    Extract(ExtractArgs),
    /// Aggregate all metadata documents into statistics
    Stats,
}

/// Arguments for the extract command.
#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["slug", "all"])))]
pub struct ExtractArgs {
    /// Project directory name inside the corpus
    pub slug: Option<String>,

    /// Extract every project in the corpus
    #[arg(long)]
    pub all: bool,
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "animscan=debug" } else { "animscan=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Use `--config` if given, else a discovered file in the working
/// directory, else built-in defaults.
fn load_config(global: &GlobalArgs) -> Result<ScanConfig, ScanError> {
    let path = match &global.config {
        Some(p) => Some(p.clone()),
        None => ScanConfig::discover(Path::new(".")),
    };
    match path {
        Some(p) => ScanConfig::parse_file(p),
        None => Ok(ScanConfig::default()),
    }
}

fn load_versions(global: &GlobalArgs) -> Result<VersionManifest, ScanError> {
    match &global.versions {
        Some(p) => VersionManifest::load(p),
        None => Ok(VersionManifest::default()),
    }
}

/// Run the extract command.
pub fn run_extract(global: &GlobalArgs, args: &ExtractArgs) -> anyhow::Result<i32> {
    let config = match load_config(global) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let versions = match load_versions(global) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let pipeline =
        Pipeline::new(&config, &global.corpus, &global.metadata_dir).with_versions(versions);

    if args.all {
        return match pipeline.extract_all() {
            Ok(report) => {
                write_tally(&report);
                Ok(if report.has_failures() {
                    EXIT_FAILED
                } else {
                    EXIT_SUCCESS
                })
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                Ok(EXIT_ERROR)
            }
        };
    }

    let slug = match &args.slug {
        Some(s) => s,
        None => anyhow::bail!("either a slug or --all is required"),
    };
    match pipeline.extract_one(slug) {
        Ok(path) => {
            println!("{} {} -> {}", "✓".green(), slug, path.display());
            Ok(EXIT_SUCCESS)
        }
        Err(e) if e.is_fatal() => {
            eprintln!("Error: {}", e);
            Ok(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("{} {}: {}", "✗".red(), slug, e);
            Ok(EXIT_FAILED)
        }
    }
}

/// Run the stats command.
pub fn run_stats(global: &GlobalArgs) -> anyhow::Result<i32> {
    let config = match load_config(global) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    match pipeline::run_stats(&global.metadata_dir, &global.stats_output, &config) {
        Ok(stats) => {
            println!(
                "{} aggregated {} animations -> {}",
                "✓".green(),
                stats.total_animations,
                global.stats_output.display()
            );
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(EXIT_ERROR)
        }
    }
}

fn write_tally(report: &BatchReport) {
    println!("{}", "animscan extract".cyan().bold());
    println!();
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(_) => println!("  {} {}", "✓".green(), outcome.slug),
            Err(e) => println!("  {} {}: {}", "✗".red(), outcome.slug, e),
        }
    }
    println!();

    let failed = report.failed();
    let failed_text = format!("{} failed", failed);
    println!(
        "  {} succeeded, {}",
        report.succeeded().to_string().green().bold(),
        if failed > 0 {
            failed_text.red().bold()
        } else {
            failed_text.normal()
        }
    );
}
