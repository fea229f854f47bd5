//! Command-line interface definitions for Newsroom Sweep.
//!
//! Tunables can also come from environment variables, so scheduled runs
//! can be configured without editing the command line.

use clap::Parser;

/// Command-line arguments for the Newsroom Sweep application.
///
/// # Examples
///
/// ```sh
/// # Every source, one day, report printed to stdout
/// newsroom_sweep --start 2025-06-10
///
/// # A week of convenience-store releases written to disk
/// newsroom_sweep --start 2025-06-01 --end 2025-06-07 \
///     --category "Convenience stores" -j ./json -m ./markdown
///
/// # Just two sources
/// newsroom_sweep --start 2025-06-10 --source lawson,famima
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// First day of the range (YYYY-MM-DD)
    #[arg(short, long, required_unless_present = "list_sources")]
    pub start: Option<String>,

    /// Last day of the range (YYYY-MM-DD), defaults to --start
    #[arg(short, long)]
    pub end: Option<String>,

    /// Source ids to check; repeat the flag or separate with commas
    #[arg(long = "source", value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Check every source in this category
    #[arg(long, conflicts_with = "sources")]
    pub category: Option<String>,

    /// Path to a sources YAML file instead of the built-in registry
    #[arg(short, long, env = "NEWSROOM_REGISTRY")]
    pub registry: Option<String>,

    /// How many sources are fetched at once
    #[arg(long, env = "NEWSROOM_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,

    /// Per-source fetch timeout in seconds
    #[arg(long, env = "NEWSROOM_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Stop scanning a page after its first matching release
    #[arg(long)]
    pub first_match_only: bool,

    /// Output directory for the JSON report
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Output directory for the Markdown report
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Print the registry grouped by category and exit
    #[arg(long)]
    pub list_sources: bool,
}
