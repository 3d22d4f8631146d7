//! Listening event enrichment
//!
//! Left-joins listening events to songs (song_id), users (user_id) and
//! singers (the joined song's singer_id), then derives `year` and `hour` from
//! the parsed `listen_datetime`.
//!
//! Left order is preserved. An unmatched side leaves its attributes `None`;
//! a key matching several dimension rows yields one output row per match,
//! in song → user → singer nesting order. Dimension keys are checked first,
//! so in strict mode a repeated key aborts before any row is joined.

use super::key_checker::{check_keys, KeyCheckReport};
use super::loader::SourceTables;
use chrono::{Datelike, Timelike};
use mla_common::time::parse_listen_datetime;
use mla_common::{EnrichedEvent, Error, Result, Singer, Song, User};
use std::collections::HashMap;

/// Enrichment settings
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichOptions {
    /// Fail with `JoinCardinalityViolation` on a repeated dimension key
    pub strict_keys: bool,
}

/// Enriched events plus the user table, which two reports join against again
#[derive(Debug, Clone, Default)]
pub struct EnrichedData {
    pub events: Vec<EnrichedEvent>,
    pub users: Vec<User>,
    /// Key check findings for the source tables
    pub key_check: KeyCheckReport,
}

/// Key → every row carrying that key, in table order
fn index_by<T>(rows: &[T], key: impl Fn(&T) -> i64) -> HashMap<i64, Vec<&T>> {
    let mut index: HashMap<i64, Vec<&T>> = HashMap::new();
    for row in rows {
        index.entry(key(row)).or_default().push(row);
    }
    index
}

/// Left-join lookup: every match, or a single `None` when there is none
fn left_matches<'a, T>(index: &HashMap<i64, Vec<&'a T>>, key: Option<i64>) -> Vec<Option<&'a T>> {
    match key.and_then(|k| index.get(&k)) {
        Some(rows) => rows.iter().map(|row| Some(*row)).collect(),
        None => vec![None],
    }
}

/// Join and derive calendar fields for every listening event
///
/// # Errors
/// - `JoinCardinalityViolation` for a repeated dimension key in strict mode
/// - `Parse` on the first unparseable `listen_datetime`; nothing is returned
///   for the rows before it
pub fn enrich(tables: SourceTables, options: EnrichOptions) -> Result<EnrichedData> {
    let key_check = check_keys(&tables, options.strict_keys)?;

    let SourceTables {
        listening,
        songs,
        users,
        singers,
    } = tables;

    let songs_by_id: HashMap<i64, Vec<&Song>> = index_by(&songs, |s| s.song_id);
    let users_by_id: HashMap<i64, Vec<&User>> = index_by(&users, |u| u.user_id);
    let singers_by_id: HashMap<i64, Vec<&Singer>> = index_by(&singers, |s| s.singer_id);

    let mut events = Vec::with_capacity(listening.len());
    for event in &listening {
        let listened_at =
            parse_listen_datetime(&event.listen_datetime).ok_or_else(|| Error::Parse {
                listening_id: event.listening_id,
                value: event.listen_datetime.clone(),
            })?;
        let year = listened_at.year();
        let hour = listened_at.hour();

        for song in left_matches(&songs_by_id, Some(event.song_id)) {
            for user in left_matches(&users_by_id, Some(event.user_id)) {
                let singer_id = song.map(|s| s.singer_id);
                for singer in left_matches(&singers_by_id, singer_id) {
                    events.push(EnrichedEvent {
                        listening_id: event.listening_id,
                        user_id: event.user_id,
                        song_id: event.song_id,
                        listen_datetime: listened_at,
                        song: song.map(|s| s.song.clone()),
                        singer_id,
                        age: user.map(|u| u.age),
                        city: user.map(|u| u.city.clone()),
                        singer: singer.map(|s| s.singer.clone()),
                        year,
                        hour,
                    });
                }
            }
        }
    }

    Ok(EnrichedData {
        events,
        users,
        key_check,
    })
}
