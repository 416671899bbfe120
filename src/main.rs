//! CLI entry point for the oaharvest tool.

use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use oaharvest::{
    ExtractResult, PdfFetcher, Pipeline, RunSummary, build_default_resolver_chain,
    extract_references, load_sheet, write_report,
};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    init_tracing(&args);

    debug!(?args, "CLI arguments parsed");
    info!("oaharvest starting");

    if !args.quiet {
        println!("Loading reference file...");
    }

    // Input errors degrade to an empty reference set; the run continues and
    // reports zero processed.
    let extracted = match load_sheet(&args.input) {
        Ok(sheet) => extract_references(&sheet),
        Err(error) => {
            warn!(error = %error, "Failed to read reference spreadsheet");
            ExtractResult::default()
        }
    };

    if !args.quiet {
        println!("\nAnalysis:");
        println!("Total references in file: {}", extracted.total_rows);
        println!("Valid DOIs found: {}", extracted.len());
    }
    info!(
        total = extracted.total_rows,
        valid = extracted.len(),
        "Reference file analyzed"
    );

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "cannot create output directory '{}'",
            args.output_dir.display()
        )
    })?;

    let chain = build_default_resolver_chain(&args.email, args.lookup_timeout);
    let fetcher = PdfFetcher::new_with_timeouts(
        oaharvest::download::CONNECT_TIMEOUT_SECS,
        args.download_timeout,
    );
    let pipeline = Pipeline::new(chain, fetcher, &args.output_dir);

    if !args.quiet {
        println!("\nStarting download process...");
    }
    info!(references = extracted.len(), "Starting download process");

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(extracted.len() as u64)
    };

    let mut reports = Vec::with_capacity(extracted.len());
    for reference in &extracted.references {
        reports.push(pipeline.process_reference(reference).await);
        progress.inc(1);
    }
    progress.finish_and_clear();

    // Report-write failures are logged but never suppress the summary.
    let report_written = match write_report(&args.report, &reports) {
        Ok(()) => true,
        Err(error) => {
            warn!(error = %error, "Failed to write report file");
            false
        }
    };

    let summary = RunSummary::from_reports(extracted.total_rows, &reports);
    if !args.quiet {
        println!("\nSummary:");
        println!("Total DOIs processed: {}", summary.processed);
        println!("Successfully downloaded: {}", summary.successful);
        println!("Failed: {}", summary.failed);
        if report_written {
            println!("\nDetailed results saved to {}", args.report.display());
        }
    }
    info!(
        processed = summary.processed,
        successful = summary.successful,
        failed = summary.failed,
        "Run complete"
    );

    Ok(())
}

/// Initializes tracing with a console layer and a debug-level file layer.
///
/// Console level priority: RUST_LOG env var > quiet flag > verbose flag >
/// default (info). The file layer is the diagnostic log: full debug trace,
/// no ANSI, truncated at startup. When the log file cannot be created the
/// run continues console-only.
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = match File::create(&args.log_file) {
        Ok(log_file) => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false)
                .with_filter(EnvFilter::new("debug")),
        ),
        Err(error) => {
            eprintln!(
                "warning: cannot create log file '{}': {error}; continuing without file log",
                args.log_file.display()
            );
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
