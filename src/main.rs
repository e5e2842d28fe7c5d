//! CLI entry point for the icon audit tool.

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use icon_audit::progress::progress_bar;
use icon_audit::{AuditConfig, AuditEngine, HttpFetcher, ImageSniffer, UrlTemplate};
use tracing::{debug, info};

mod cli;

use cli::{Args, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let start = Instant::now();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = AuditConfig::new(
        UrlTemplate::new(args.template.as_str())?,
        args.count,
        usize::from(args.concurrency),
        &args.expected,
    )?;

    let engine = AuditEngine::new(
        config,
        Arc::new(HttpFetcher::new()?),
        Arc::new(ImageSniffer::default()),
    )?;

    info!(
        count = args.count,
        concurrency = args.concurrency,
        template = %args.template,
        "icon audit starting"
    );

    let show_progress = !args.no_progress && args.count > 0 && io::stderr().is_terminal();
    let run = if show_progress {
        let bar = progress_bar(u64::from(args.count));
        let run = engine.run_with_progress(Arc::new(bar.clone())).await;
        bar.finish_and_clear();
        run?
    } else {
        engine.run().await?
    };

    info!(
        mismatches = run.report.mismatches().count(),
        failures = run.report.failures().count(),
        skipped = run.stats.skipped(),
        panicked = run.stats.panicked(),
        "icon audit finished"
    );

    match args.format {
        OutputFormat::Text => {
            print!("{}", run.report);
            println!("ExecutionTime {:?}", start.elapsed());
        }
        OutputFormat::Json => println!("{}", run.report.to_json()?),
    }

    Ok(())
}
