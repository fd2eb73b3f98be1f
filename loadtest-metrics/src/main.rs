use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use loadtest_metrics::{run, ToolConfig};
use tracing::info;

/// Extract and compare k6 load-test results (local vs cloud)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Baseline results file [default: local_results.json]
    local: Option<PathBuf>,

    /// Candidate results file [default: cloud_results.json]
    cloud: Option<PathBuf>,

    /// TOML file with k6-style thresholds (overrides LOADTEST_THRESHOLDS)
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Skip threshold evaluation
    #[arg(long, default_value_t = false)]
    no_thresholds: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ToolConfig::default().with_paths(args.local, args.cloud);
    if args.thresholds.is_some() {
        config.thresholds_path = args.thresholds;
    }
    config.check_thresholds = !args.no_thresholds;

    let thresholds = config
        .thresholds()
        .context("Failed to load threshold definitions")?;
    info!(
        baseline = %config.baseline_file.display(),
        candidate = %config.candidate_file.display(),
        thresholds = thresholds.thresholds().len(),
        "Extracting load-test metrics"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&config, &thresholds, &mut out).context("Failed to write report")?;
    out.flush()?;

    Ok(())
}
