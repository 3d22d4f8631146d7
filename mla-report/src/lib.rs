//! mla-report library interface
//!
//! Loader, enricher, aggregator and reporter services plus the pipeline that
//! composes them. Exposed as a library for the binary and integration tests.

pub mod models;
pub mod pipeline;
pub mod services;

pub use models::{ReportTable, Value};
pub use pipeline::{Pipeline, PipelineStatistics, RunOutcome};
pub use services::{ReportName, ReportSet};
