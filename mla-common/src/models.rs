//! Source and enriched record models
//!
//! Source records mirror the CSV header names exactly so they can be decoded
//! with `csv::Reader::deserialize`. Every source type also publishes the
//! columns it requires, which the loader checks before decoding any row.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A CSV-backed record type with a fixed set of required columns
pub trait SourceRecord: DeserializeOwned {
    /// File name under the data directory
    const FILE_NAME: &'static str;
    /// Columns that must be present in the header row
    const COLUMNS: &'static [&'static str];
}

/// One play of a song by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningEvent {
    pub listening_id: i64,
    pub user_id: i64,
    /// Sample data fills this from singer ids; joined against songs as-is
    pub song_id: i64,
    /// Raw timestamp text, parsed during enrichment
    pub listen_datetime: String,
}

impl SourceRecord for ListeningEvent {
    const FILE_NAME: &'static str = "listening.csv";
    const COLUMNS: &'static [&'static str] =
        &["listening_id", "user_id", "song_id", "listen_datetime"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub song_id: i64,
    pub song: String,
    pub singer_id: i64,
}

impl SourceRecord for Song {
    const FILE_NAME: &'static str = "songs.csv";
    const COLUMNS: &'static [&'static str] = &["song_id", "song", "singer_id"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Singer {
    pub singer_id: i64,
    pub singer: String,
}

impl SourceRecord for Singer {
    const FILE_NAME: &'static str = "singer.csv";
    const COLUMNS: &'static [&'static str] = &["singer_id", "singer"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub age: i64,
    pub city: String,
}

impl SourceRecord for User {
    const FILE_NAME: &'static str = "users.csv";
    const COLUMNS: &'static [&'static str] = &["user_id", "age", "city"];
}

/// Listening event with song, user and singer attributes attached
///
/// Attributes from an unmatched join side stay `None`; the row itself is
/// never dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedEvent {
    pub listening_id: i64,
    pub user_id: i64,
    pub song_id: i64,
    pub listen_datetime: NaiveDateTime,
    pub song: Option<String>,
    pub singer_id: Option<i64>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub singer: Option<String>,
    /// Calendar year of `listen_datetime`
    pub year: i32,
    /// Hour of day of `listen_datetime`, 0-23
    pub hour: u32,
}
