//! Triage CLI — one batch run over a feed dump.
//! Reads raw items, clusters and scores them, writes the output tables and
//! prints the top of the decision list.

use anyhow::Result;
use clap::Parser;
use newsroom_triage::config::{SignalBackend, TriageConfig};
use newsroom_triage::engine::TriageEngine;
use newsroom_triage::ingest::file::FileProvider;
use newsroom_triage::ingest::types::ItemProvider;
use newsroom_triage::report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "triage", about = "News dedup + scoring + POST/WATCH/DROP triage")]
struct Args {
    /// JSON file with raw items (feed collector hand-off).
    #[arg(long)]
    input: PathBuf,

    /// Output directory for clusters/social_signals/decisions/raw.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Config file (TOML); falls back to TRIAGE_CONFIG_PATH, then defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scan window in minutes (overrides config).
    #[arg(long)]
    minutes: Option<i64>,

    /// How many decisions to print.
    #[arg(long, default_value_t = 15)]
    top: usize,

    /// Use the deterministic mock signal backend.
    #[arg(long)]
    mock_social: bool,

    /// Ignore the brand profile; score brand-fit from entity presence only.
    #[arg(long)]
    no_brand_fit: bool,

    /// POST cutoff (overrides config).
    #[arg(long)]
    post_cutoff: Option<f64>,

    /// WATCH cutoff (overrides config).
    #[arg(long)]
    watch_cutoff: Option<f64>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();

    let mut config = TriageConfig::load(args.config.as_deref())?;
    if let Some(minutes) = args.minutes {
        config.scan_minutes = minutes;
    }
    if let Some(post) = args.post_cutoff {
        config.cutoffs.post = post;
    }
    if let Some(watch) = args.watch_cutoff {
        config.cutoffs.watch = watch;
    }
    if args.mock_social {
        config.signals.backend = SignalBackend::Mock;
    }
    if args.no_brand_fit {
        config.general_brand_fit = true;
    }
    // Overrides can invalidate a previously valid file; re-check before work.
    config.validate()?;

    let engine = TriageEngine::from_config(config)?;
    let providers: Vec<Box<dyn ItemProvider>> = vec![Box::new(FileProvider::new(&args.input))];

    let output = engine.run(&providers).await?;
    report::write_outputs(&args.out_dir, &output)?;

    println!("{}", report::render_top(&output, args.top));
    println!(
        "items: {} kept, {} missing fields, {} boilerplate, {} stale ({} provider errors)",
        output.summary.kept,
        output.summary.missing_field,
        output.summary.boilerplate,
        output.summary.stale,
        output.summary.provider_errors,
    );
    println!("outputs in {}", args.out_dir.display());

    Ok(())
}
