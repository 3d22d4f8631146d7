//! Dimension key checks
//!
//! The enricher's left joins emit one row per matching dimension record, so a
//! dimension table with a repeated key inflates the enriched row count. This
//! service finds repeated keys and dangling foreign keys before enrichment.
//! Repeated keys are warnings unless strict mode turns them into
//! `JoinCardinalityViolation`.

use super::loader::SourceTables;
use mla_common::{Error, Result};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// A key that occurs more than once in a dimension table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub table: &'static str,
    pub key: i64,
    pub occurrences: usize,
}

/// Findings of one key check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyCheckReport {
    pub duplicates: Vec<DuplicateKey>,
    /// Listening events whose song_id has no song record
    pub dangling_song_refs: usize,
    /// Listening events whose user_id has no user record
    pub dangling_user_refs: usize,
    /// Songs whose singer_id has no singer record
    pub dangling_singer_refs: usize,
}

impl KeyCheckReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
            && self.dangling_song_refs == 0
            && self.dangling_user_refs == 0
            && self.dangling_singer_refs == 0
    }
}

/// Repeated keys of one table, ascending by key
pub fn find_duplicate_keys<T>(
    table: &'static str,
    rows: &[T],
    key: impl Fn(&T) -> i64,
) -> Vec<DuplicateKey> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, occurrences)| *occurrences > 1)
        .map(|(key, occurrences)| DuplicateKey {
            table,
            key,
            occurrences,
        })
        .collect()
}

/// Check every dimension table and every foreign key
///
/// In strict mode the first duplicate (songs, then users, then singers;
/// lowest key first) aborts with `JoinCardinalityViolation`.
pub fn check_keys(tables: &SourceTables, strict: bool) -> Result<KeyCheckReport> {
    let mut duplicates = find_duplicate_keys("songs", &tables.songs, |s| s.song_id);
    duplicates.extend(find_duplicate_keys("users", &tables.users, |u| u.user_id));
    duplicates.extend(find_duplicate_keys("singers", &tables.singers, |s| {
        s.singer_id
    }));

    if strict {
        if let Some(first) = duplicates.first() {
            return Err(Error::JoinCardinalityViolation {
                table: first.table.to_string(),
                key: first.key,
                occurrences: first.occurrences,
            });
        }
    }

    for duplicate in &duplicates {
        warn!(
            table = duplicate.table,
            key = duplicate.key,
            occurrences = duplicate.occurrences,
            "Duplicate dimension key, joined rows will be repeated"
        );
    }

    let song_ids: HashSet<i64> = tables.songs.iter().map(|s| s.song_id).collect();
    let user_ids: HashSet<i64> = tables.users.iter().map(|u| u.user_id).collect();
    let singer_ids: HashSet<i64> = tables.singers.iter().map(|s| s.singer_id).collect();

    let report = KeyCheckReport {
        duplicates,
        dangling_song_refs: tables
            .listening
            .iter()
            .filter(|e| !song_ids.contains(&e.song_id))
            .count(),
        dangling_user_refs: tables
            .listening
            .iter()
            .filter(|e| !user_ids.contains(&e.user_id))
            .count(),
        dangling_singer_refs: tables
            .songs
            .iter()
            .filter(|s| !singer_ids.contains(&s.singer_id))
            .count(),
    };

    if report.dangling_song_refs > 0 || report.dangling_user_refs > 0 {
        warn!(
            unmatched_song_refs = report.dangling_song_refs,
            unmatched_user_refs = report.dangling_user_refs,
            "Listening events reference unknown songs or users, their attributes will be null"
        );
    }
    if report.dangling_singer_refs > 0 {
        warn!(
            unmatched_singer_refs = report.dangling_singer_refs,
            "Songs reference unknown singers"
        );
    }

    Ok(report)
}
