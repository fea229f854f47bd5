//! Markdown rendering of a run report.
//!
//! Items are grouped by company in the order the sources were checked.
//! Fallback records (link-only pointers and fetch failures) are flagged so
//! a reader can tell them from real releases.

use super::json::report_file_stem;
use itertools::Itertools;
use newsroom_sweep::models::{NewsItem, RunReport};
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

fn item_line(item: &NewsItem) -> String {
    let flag = if item.is_error {
        " **(fetch failed)**"
    } else if item.is_link_only {
        " *(link only)*"
    } else {
        ""
    };
    format!("- [{}]({}) — {}{}", escape_brackets(&item.title), item.url, item.date, flag)
}

fn escape_brackets(title: &str) -> String {
    title.replace('[', "\\[").replace(']', "\\]")
}

/// Render a [`RunReport`] as a Markdown document.
pub fn report_to_markdown(report: &RunReport) -> String {
    let mut md = String::new();
    let range = &report.range;
    if range.start == range.end {
        let _ = writeln!(md, "# Press releases for {}\n", range.start);
    } else {
        let _ = writeln!(md, "# Press releases from {} to {}\n", range.start, range.end);
    }

    if report.items.is_empty() {
        md.push_str("_No releases found in this range._\n\n");
    }

    for (company, items) in &report.items.iter().chunk_by(|i| i.company_name.as_str()) {
        let _ = writeln!(md, "## {company}\n");
        for item in items {
            let _ = writeln!(md, "{}", item_line(item));
        }
        md.push('\n');
    }

    let _ = writeln!(md, "## Checked sources ({})\n", report.checked_sources.len());
    for name in &report.checked_sources {
        let _ = writeln!(md, "- {name}");
    }

    md.push_str("\n## Extraction log\n\n```text\n");
    for line in report.log.lines() {
        let _ = writeln!(md, "{line}");
    }
    md.push_str("```\n");
    md
}

/// Write the Markdown report to `{markdown_output_dir}/{start}_{end}.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_report(
    report: &RunReport,
    markdown_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    fs::create_dir_all(markdown_output_dir).await?;
    let path = format!(
        "{}/{}.md",
        markdown_output_dir.trim_end_matches('/'),
        report_file_stem(report)
    );
    fs::write(&path, report_to_markdown(report)).await?;
    info!(%path, "Wrote Markdown report");
    Ok(path)
}
