//! Phase 4: REPORTING

use super::statistics::{PipelineStatistics, ReportingStats};
use super::Pipeline;
use crate::services::{ReportSet, Reporter, WrittenReport};
use chrono::{DateTime, Local};
use mla_common::Result;
use tracing::info;

impl Pipeline {
    /// Phase 4: REPORTING - Render the reports and write the output file
    pub(super) fn phase_reporting(
        &self,
        reports: &ReportSet,
        at: &DateTime<Local>,
        statistics: &mut PipelineStatistics,
    ) -> Result<WrittenReport> {
        info!(format = %self.config.format, "Phase 4: REPORTING");

        let reporter = Reporter::new(&self.config.output_dir, self.config.format);
        let written = reporter.write(reports, at)?;

        statistics.reporting = ReportingStats {
            output_path: Some(written.path.clone()),
            bytes_written: written.bytes,
        };
        info!(path = %written.path.display(), bytes = written.bytes, "REPORTING complete");

        Ok(written)
    }
}
