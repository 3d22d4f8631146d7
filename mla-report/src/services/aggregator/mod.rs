//! Report aggregation
//!
//! Computes the twelve fixed reports over the enriched events. Reports are
//! independent of one another and only borrow the input, so they can run on
//! the rayon pool; the result is identical to a sequential run because every
//! shape is deterministic and results are collected in report order.

mod shapes;

pub use shapes::{
    attach_user_attributes, count_by, most_listened_by_city_and_year, most_listened_by_year,
    most_listened_overall, popularity_change_over_time, top_per_partition,
    user_segmentation_analysis, Dimension, GroupCounts, COUNT_COLUMN,
};

use super::enricher::EnrichedData;
use crate::models::ReportTable;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::fmt;

/// Identifier of one of the twelve reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportName {
    MostListenedSingerByYear,
    MostListenedSongByYear,
    MostActiveUserByYear,
    MostListenedByCityAndYear,
    MostListenedSingerOverall,
    MostListenedSongOverall,
    MostActiveUserOverall,
    MostPopularHours,
    PopularityChangeOfSingers,
    PopularityChangeOfSongs,
    UserSegmentationByAge,
    UserSegmentationByCity,
}

impl ReportName {
    /// All reports in output order
    pub const ALL: [ReportName; 12] = [
        ReportName::MostListenedSingerByYear,
        ReportName::MostListenedSongByYear,
        ReportName::MostActiveUserByYear,
        ReportName::MostListenedByCityAndYear,
        ReportName::MostListenedSingerOverall,
        ReportName::MostListenedSongOverall,
        ReportName::MostActiveUserOverall,
        ReportName::MostPopularHours,
        ReportName::PopularityChangeOfSingers,
        ReportName::PopularityChangeOfSongs,
        ReportName::UserSegmentationByAge,
        ReportName::UserSegmentationByCity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportName::MostListenedSingerByYear => "most_listened_singer_by_year",
            ReportName::MostListenedSongByYear => "most_listened_song_by_year",
            ReportName::MostActiveUserByYear => "most_active_user_by_year",
            ReportName::MostListenedByCityAndYear => "most_listened_by_city_and_year",
            ReportName::MostListenedSingerOverall => "most_listened_singer_overall",
            ReportName::MostListenedSongOverall => "most_listened_song_overall",
            ReportName::MostActiveUserOverall => "most_active_user_overall",
            ReportName::MostPopularHours => "most_popular_hours",
            ReportName::PopularityChangeOfSingers => "popularity_change_of_singers",
            ReportName::PopularityChangeOfSongs => "popularity_change_of_songs",
            ReportName::UserSegmentationByAge => "user_segmentation_by_age",
            ReportName::UserSegmentationByCity => "user_segmentation_by_city",
        }
    }

    /// Display title: underscores to spaces, every word capitalised
    pub fn title(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ReportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reports in output order
pub type ReportSet = IndexMap<ReportName, ReportTable>;

/// Compute one report
pub fn compute_report(name: ReportName, data: &EnrichedData) -> ReportTable {
    let events = &data.events;
    match name {
        ReportName::MostListenedSingerByYear => most_listened_by_year(events, Dimension::Singer),
        ReportName::MostListenedSongByYear => most_listened_by_year(events, Dimension::Song),
        ReportName::MostActiveUserByYear => attach_user_attributes(
            most_listened_by_year(events, Dimension::UserId),
            &data.users,
            Dimension::UserId.column_name(),
        ),
        ReportName::MostListenedByCityAndYear => most_listened_by_city_and_year(events),
        ReportName::MostListenedSingerOverall => most_listened_overall(events, Dimension::Singer),
        ReportName::MostListenedSongOverall => most_listened_overall(events, Dimension::Song),
        ReportName::MostActiveUserOverall => attach_user_attributes(
            most_listened_overall(events, Dimension::UserId),
            &data.users,
            Dimension::UserId.column_name(),
        ),
        ReportName::MostPopularHours => user_segmentation_analysis(events, Dimension::Hour),
        ReportName::PopularityChangeOfSingers => {
            popularity_change_over_time(events, Dimension::Singer)
        }
        ReportName::PopularityChangeOfSongs => popularity_change_over_time(events, Dimension::Song),
        ReportName::UserSegmentationByAge => user_segmentation_analysis(events, Dimension::Age),
        ReportName::UserSegmentationByCity => user_segmentation_analysis(events, Dimension::City),
    }
}

/// Compute all twelve reports, on the rayon pool when `parallel` is set
pub fn compute_reports(data: &EnrichedData, parallel: bool) -> ReportSet {
    Aggregator::new(parallel).compute_all(data)
}

/// Computes the full [`ReportSet`]
pub struct Aggregator {
    parallel: bool,
}

impl Aggregator {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    pub fn compute_all(&self, data: &EnrichedData) -> ReportSet {
        let tables: Vec<ReportTable> = if self.parallel {
            ReportName::ALL
                .par_iter()
                .map(|name| compute_report(*name, data))
                .collect()
        } else {
            ReportName::ALL
                .iter()
                .map(|name| compute_report(*name, data))
                .collect()
        };

        ReportName::ALL.iter().copied().zip(tables).collect()
    }
}
