//! Analytics pipeline orchestrator
//!
//! # Phase Progression
//! LOADING → ENRICHING → AGGREGATING → REPORTING
//!
//! Each phase lives in its own `phase_*` module as a method on [`Pipeline`].
//! Every phase fully materialises its output and hands it to the next one by
//! value; the first error aborts the run before anything is written.

use chrono::{DateTime, Local};
use mla_common::config::AnalyticsConfig;
use mla_common::Result;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

mod phase_aggregating;
mod phase_enriching;
mod phase_loading;
mod phase_reporting;
pub mod statistics;

pub use statistics::{
    AggregatingStats, EnrichingStats, LoadingStats, PipelineStatistics, ReportingStats,
};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output_path: PathBuf,
    pub statistics: PipelineStatistics,
}

/// Runs the four phases for one configuration
pub struct Pipeline {
    config: AnalyticsConfig,
}

impl Pipeline {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Run every phase, stamping the output file with the current local time
    pub fn run(&self) -> Result<RunOutcome> {
        self.run_at(mla_common::time::now())
    }

    /// Run every phase, stamping the output file with `at`
    pub fn run_at(&self, at: DateTime<Local>) -> Result<RunOutcome> {
        let start_time = Instant::now();
        let mut statistics = PipelineStatistics::default();

        info!(
            data_dir = %self.config.data_dir.display(),
            output_dir = %self.config.output_dir.display(),
            format = %self.config.format,
            "Starting analytics pipeline"
        );

        let tables = self.phase_loading(&mut statistics)?;
        let data = self.phase_enriching(tables, &mut statistics)?;
        let reports = self.phase_aggregating(&data, &mut statistics);
        let written = self.phase_reporting(&reports, &at, &mut statistics)?;

        statistics.elapsed = start_time.elapsed();
        log_summary(&statistics);

        Ok(RunOutcome {
            output_path: written.path,
            statistics,
        })
    }

    /// Load and enrich only; nothing is written
    pub fn check(&self) -> Result<PipelineStatistics> {
        let start_time = Instant::now();
        let mut statistics = PipelineStatistics::default();

        info!(data_dir = %self.config.data_dir.display(), "Checking input tables");

        let tables = self.phase_loading(&mut statistics)?;
        self.phase_enriching(tables, &mut statistics)?;

        statistics.elapsed = start_time.elapsed();
        log_summary(&statistics);
        Ok(statistics)
    }
}

fn log_summary(statistics: &PipelineStatistics) {
    for line in statistics.display_lines() {
        info!("{}", line);
    }
}
