//! Output generation for run reports.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`RunReport`](newsroom_sweep::models::RunReport) as JSON for other tools
//! - [`markdown`]: Renders the report for people to read
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-06-01_2025-06-07.json
//!
//! markdown_output_dir/
//! └── 2025-06-01_2025-06-07.md
//! ```

pub mod json;
pub mod markdown;
