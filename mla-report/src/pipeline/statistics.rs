//! Pipeline statistics
//!
//! One struct per phase, each with a one-line `display_string()` that the
//! pipeline logs once the phase finishes.

use mla_common::human_time::format_elapsed;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// **LOADING Phase Statistics**
///
/// Display: "N listening events, N songs, N users, N singers loaded"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingStats {
    pub listening_events: usize,
    pub songs: usize,
    pub users: usize,
    pub singers: usize,
}

impl LoadingStats {
    pub fn display_string(&self) -> String {
        format!(
            "{} listening events, {} songs, {} users, {} singers loaded",
            self.listening_events, self.songs, self.users, self.singers
        )
    }
}

/// **ENRICHING Phase Statistics**
///
/// Display: "N enriched rows over M years, X without song, Y without user, Z without singer"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichingStats {
    /// Rows after the joins (exceeds the event count when dimension keys repeat)
    pub enriched_rows: usize,
    pub distinct_years: usize,
    pub without_song: usize,
    pub without_user: usize,
    pub without_singer: usize,
    /// Repeated keys across the three dimension tables
    pub duplicate_keys: usize,
}

impl EnrichingStats {
    pub fn display_string(&self) -> String {
        let mut line = format!(
            "{} enriched rows over {} years, {} without song, {} without user, {} without singer",
            self.enriched_rows,
            self.distinct_years,
            self.without_song,
            self.without_user,
            self.without_singer
        );
        if self.duplicate_keys > 0 {
            line.push_str(&format!(", {} duplicate dimension keys", self.duplicate_keys));
        }
        line
    }
}

/// **AGGREGATING Phase Statistics**
///
/// Display: "N reports computed (M empty), R rows total"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatingStats {
    pub reports: usize,
    pub empty_reports: usize,
    pub total_rows: usize,
    pub parallel: bool,
}

impl AggregatingStats {
    pub fn display_string(&self) -> String {
        format!(
            "{} reports computed ({} empty), {} rows total{}",
            self.reports,
            self.empty_reports,
            self.total_rows,
            if self.parallel { " in parallel" } else { "" }
        )
    }
}

/// **REPORTING Phase Statistics**
///
/// Display: "N bytes written to <path>"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingStats {
    pub output_path: Option<PathBuf>,
    pub bytes_written: usize,
}

impl ReportingStats {
    pub fn display_string(&self) -> String {
        match &self.output_path {
            Some(path) => format!("{} bytes written to {}", self.bytes_written, path.display()),
            None => "no report written".to_string(),
        }
    }
}

/// **Aggregate Pipeline Statistics**
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatistics {
    pub loading: LoadingStats,
    pub enriching: EnrichingStats,
    pub aggregating: AggregatingStats,
    pub reporting: ReportingStats,
    pub elapsed: Duration,
}

impl PipelineStatistics {
    pub fn display_lines(&self) -> Vec<String> {
        vec![
            format!("LOADING: {}", self.loading.display_string()),
            format!("ENRICHING: {}", self.enriching.display_string()),
            format!("AGGREGATING: {}", self.aggregating.display_string()),
            format!("REPORTING: {}", self.reporting.display_string()),
            format!("Elapsed: {}", format_elapsed(self.elapsed)),
        ]
    }
}
