//! Phase 2: ENRICHING
//!
//! Checks dimension keys, joins song, user and singer attributes onto every
//! listening event and derives year and hour.

use super::statistics::{EnrichingStats, PipelineStatistics};
use super::Pipeline;
use crate::services::{enrich, EnrichOptions, EnrichedData, SourceTables};
use mla_common::Result;
use std::collections::BTreeSet;
use tracing::info;

impl Pipeline {
    /// Phase 2: ENRICHING - Left-join dimension attributes onto listening events
    ///
    /// # Errors
    /// `JoinCardinalityViolation` in strict key mode, `Parse` on a bad timestamp
    pub(super) fn phase_enriching(
        &self,
        tables: SourceTables,
        statistics: &mut PipelineStatistics,
    ) -> Result<EnrichedData> {
        info!(strict_keys = self.config.strict_keys, "Phase 2: ENRICHING");

        let options = EnrichOptions {
            strict_keys: self.config.strict_keys,
        };
        let data = enrich(tables, options)?;

        let distinct_years: BTreeSet<i32> = data.events.iter().map(|e| e.year).collect();
        statistics.enriching = EnrichingStats {
            enriched_rows: data.events.len(),
            distinct_years: distinct_years.len(),
            without_song: data.events.iter().filter(|e| e.song.is_none()).count(),
            without_user: data.events.iter().filter(|e| e.city.is_none()).count(),
            without_singer: data.events.iter().filter(|e| e.singer.is_none()).count(),
            duplicate_keys: data.key_check.duplicates.len(),
        };
        info!(
            rows = data.events.len(),
            years = distinct_years.len(),
            "ENRICHING complete"
        );

        Ok(data)
    }
}
