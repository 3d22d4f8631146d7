//! Phase 3: AGGREGATING

use super::statistics::{AggregatingStats, PipelineStatistics};
use super::Pipeline;
use crate::services::{Aggregator, EnrichedData, ReportSet};
use tracing::{debug, info};

impl Pipeline {
    /// Phase 3: AGGREGATING - Compute the twelve reports
    pub(super) fn phase_aggregating(
        &self,
        data: &EnrichedData,
        statistics: &mut PipelineStatistics,
    ) -> ReportSet {
        info!(parallel = self.config.parallel, "Phase 3: AGGREGATING");

        let reports = Aggregator::new(self.config.parallel).compute_all(data);

        for (name, table) in &reports {
            debug!(report = %name, rows = table.len(), columns = table.columns.len(), "Report computed");
        }

        statistics.aggregating = AggregatingStats {
            reports: reports.len(),
            empty_reports: reports.values().filter(|t| t.is_empty()).count(),
            total_rows: reports.values().map(|t| t.len()).sum(),
            parallel: self.config.parallel,
        };
        info!(reports = reports.len(), "AGGREGATING complete");

        reports
    }
}
