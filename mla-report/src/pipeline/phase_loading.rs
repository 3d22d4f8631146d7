//! Phase 1: LOADING
//!
//! Reads the four CSV tables from the configured data directory.

use super::statistics::{LoadingStats, PipelineStatistics};
use super::Pipeline;
use crate::services::{Loader, SourceTables};
use mla_common::Result;
use tracing::info;

impl Pipeline {
    /// Phase 1: LOADING - Read listening events and the three dimension tables
    pub(super) fn phase_loading(&self, statistics: &mut PipelineStatistics) -> Result<SourceTables> {
        info!("Phase 1: LOADING");

        let tables = Loader::new(&self.config.data_dir).load()?;

        statistics.loading = LoadingStats {
            listening_events: tables.listening.len(),
            songs: tables.songs.len(),
            users: tables.users.len(),
            singers: tables.singers.len(),
        };
        info!(
            listening = tables.listening.len(),
            songs = tables.songs.len(),
            users = tables.users.len(),
            singers = tables.singers.len(),
            "LOADING complete"
        );

        Ok(tables)
    }
}
