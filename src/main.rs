mod cli;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use waymark::config::WaymarkConfig;

#[derive(Parser)]
#[command(
    name = "waymark",
    about = "Jump to frequently used directories by typing a few letters of their names",
    version,
    group(ArgGroup::new("action").multiple(false))
)]
struct Cli {
    /// Directory name fragments to match, in order
    #[arg(value_name = "NEEDLE")]
    needles: Vec<String>,

    /// Record a visit to DIR (called by the shell hook on every cd)
    #[arg(short, long, value_name = "DIR", group = "action")]
    add: Option<PathBuf>,

    /// Increase the current directory's weight
    #[arg(short, long, value_name = "WEIGHT", group = "action")]
    increase: Option<Option<f64>>,

    /// Decrease the current directory's weight
    #[arg(short, long, value_name = "WEIGHT", group = "action")]
    decrease: Option<Option<f64>>,

    /// Forget directories that no longer exist
    #[arg(long, group = "action")]
    purge: bool,

    /// Show the database and its statistics
    #[arg(short, long, group = "action")]
    stats: bool,

    /// Print statistics as JSON
    #[arg(long, requires = "stats")]
    json: bool,

    /// Print tab-completion candidates for the last needle
    #[arg(long, group = "action")]
    complete: bool,

    /// Wrap printed paths in single quotes
    #[arg(long)]
    quotes: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = WaymarkConfig::load()?;

    // Log to stderr so stdout stays clean for the shell.
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let step = config.weights.adjust_step;
    if let Some(dir) = cli.add {
        cli::add::add(&config, &dir)
    } else if let Some(weight) = cli.increase {
        cli::add::adjust_current(&config, weight.unwrap_or(step))
    } else if let Some(weight) = cli.decrease {
        cli::add::adjust_current(&config, -weight.unwrap_or(step))
    } else if cli.purge {
        cli::purge::purge(&config)
    } else if cli.stats {
        cli::stats::stats(&config, cli.json)
    } else if cli.complete {
        cli::complete::complete(&config, &cli.needles, cli.quotes)
    } else {
        cli::jump::jump(&config, &cli.needles, cli.quotes)
    }
}
