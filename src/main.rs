//! # Newsroom Sweep
//!
//! Checks a list of corporate newsroom pages for press releases dated
//! within a range and reports what it found, source by source.
//!
//! ## Usage
//!
//! ```sh
//! newsroom_sweep --start 2025-06-01 --end 2025-06-07 -j ./json -m ./markdown
//! newsroom_sweep --list-sources
//! ```
//!
//! ## Pipeline
//!
//! 1. **Registry**: built-in `sources.yaml` or `--registry <path>`
//! 2. **Selection**: `--source`, `--category`, or every source
//! 3. **Run**: fetch, classify and extract, several sources at a time
//! 4. **Output**: JSON and Markdown reports, or JSON on stdout

use clap::Parser;
use newsroom_sweep::{Coordinator, DateRange, HttpGateway, Registry, RunOptions, ScanPolicy};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod outputs;

use cli::Cli;
use outputs::{json, markdown};

fn print_sources(registry: &Registry) {
    for (category, sources) in registry.categories() {
        println!("{category}");
        for s in sources {
            println!("  {:<24} {:<10} {}", s.id, s.strategy.to_string(), s.display_name);
        }
    }
}

/// Resolve the CLI's source selection against the registry.
fn select_sources(args: &Cli, registry: &Registry) -> Vec<String> {
    if let Some(category) = &args.category {
        let ids = registry.ids_in_category(category);
        if ids.is_empty() {
            warn!(%category, "No sources in this category");
        }
        ids
    } else if !args.sources.is_empty() {
        for id in args.sources.iter().filter(|id| registry.get(id).is_none()) {
            warn!(%id, "Unknown source id; it will be ignored");
        }
        args.sources.clone()
    } else {
        registry.ids()
    }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let registry = match &args.registry {
        Some(path) => Registry::load(path).await?,
        None => Registry::embedded()?,
    };

    if args.list_sources {
        print_sources(&registry);
        return Ok(());
    }

    // clap guarantees --start unless --list-sources was given
    let start = args.start.as_deref().unwrap_or_default();
    let range = DateRange::parse(start, args.end.as_deref())?;
    let ids = select_sources(&args, &registry);
    info!(%range.start, %range.end, sources = ids.len(), "newsroom_sweep starting up");

    let options = RunOptions {
        concurrency: args.concurrency,
        fetch_timeout: Duration::from_secs(args.timeout_secs),
        scan_policy: if args.first_match_only {
            ScanPolicy::FirstMatch
        } else {
            ScanPolicy::AllMatches
        },
    };
    let coordinator = Coordinator::new(&registry, HttpGateway::new()?, options);
    let report = coordinator.run(&ids, range.start, range.end).await?;

    // ---- Outputs ----
    if args.json_output_dir.is_none() && args.markdown_output_dir.is_none() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_report(&report, dir).await {
            error!(error = %e, "Failed to write JSON report");
            return Err(e);
        }
    }
    if let Some(dir) = &args.markdown_output_dir {
        if let Err(e) = markdown::write_report(&report, dir).await {
            error!(error = %e, "Failed to write Markdown report");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        items = report.items.len(),
        "Execution complete"
    );
    Ok(())
}
