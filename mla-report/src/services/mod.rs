//! Service modules for the analytics pipeline
//!
//! Each service owns one stage: loading the CSV sources, checking dimension
//! keys, enriching listening events, aggregating reports, rendering them and
//! writing the report file.

pub mod aggregator;
pub mod enricher;
pub mod key_checker;
pub mod loader;
pub mod renderer;
pub mod reporter;

pub use aggregator::{compute_report, compute_reports, Aggregator, ReportName, ReportSet};
pub use enricher::{enrich, EnrichOptions, EnrichedData};
pub use key_checker::{check_keys, DuplicateKey, KeyCheckReport};
pub use loader::{load_tables, Loader, SourceTables};
pub use renderer::{render_json, render_table, render_text};
pub use reporter::{write_reports, Reporter, WrittenReport};
