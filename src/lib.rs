//! # Newsroom Sweep
//!
//! Collects press releases published within a date range from corporate
//! newsroom pages that share no common markup.
//!
//! ## Architecture
//!
//! 1. **Registry**: the list of sources and how each one is read ([`registry`])
//! 2. **Fetching**: one page per source through a [`fetch::FetchGateway`]
//! 3. **Classification**: HTTP outcome to extract / fallback record / skip ([`fallback`])
//! 4. **Extraction**: date discovery, link resolution and titles ([`scrapers`])
//! 5. **Coordination**: bounded fan-out over sources, merged in request order ([`coordinator`])
//!
//! ```no_run
//! use newsroom_sweep::{Coordinator, HttpGateway, Registry, RunOptions};
//! use chrono::NaiveDate;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::embedded()?;
//! let coordinator = Coordinator::new(&registry, HttpGateway::new()?, RunOptions::default());
//! let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
//! let report = coordinator.run(&["lawson", "famima"], day, day).await?;
//! for item in &report.items {
//!     println!("{} {} {}", item.date, item.company_name, item.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod models;
pub mod registry;
pub mod scrapers;
pub mod utils;

pub use coordinator::{Coordinator, RunOptions};
pub use error::{CandidateError, FetchError, RegistryError, RunError};
pub use fetch::{FetchGateway, HttpGateway, RawDocument};
pub use models::{DateRange, ExtractionLog, NewsItem, RunReport, SourceConfig, Strategy};
pub use registry::Registry;
pub use scrapers::ScanPolicy;
