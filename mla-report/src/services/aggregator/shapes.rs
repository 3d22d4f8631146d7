//! Reusable report shapes
//!
//! Every shape starts from [`count_by`], which groups events by a compound
//! key and counts them. Rows with a null key component are left out of the
//! grouping entirely. Counts are kept in a `BTreeMap`, so groups are always
//! visited in ascending key order; picking the first group with the highest
//! count therefore breaks ties on the smallest key.

use crate::models::{ReportTable, Value};
use mla_common::{EnrichedEvent, User};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Column name of every count column
pub const COUNT_COLUMN: &str = "count";

/// Grouping column of the enriched table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Year,
    Hour,
    UserId,
    Age,
    City,
    Song,
    Singer,
}

impl Dimension {
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Year => "year",
            Dimension::Hour => "hour",
            Dimension::UserId => "user_id",
            Dimension::Age => "age",
            Dimension::City => "city",
            Dimension::Song => "song",
            Dimension::Singer => "singer",
        }
    }

    /// This dimension's value for one event (`Null` when not enriched)
    pub fn value(self, event: &EnrichedEvent) -> Value {
        match self {
            Dimension::Year => Value::from(event.year),
            Dimension::Hour => Value::from(event.hour),
            Dimension::UserId => Value::from(event.user_id),
            Dimension::Age => Value::from(event.age),
            Dimension::City => Value::from(event.city.clone()),
            Dimension::Song => Value::from(event.song.clone()),
            Dimension::Singer => Value::from(event.singer.clone()),
        }
    }
}

/// Group counts keyed by compound key, ascending
pub type GroupCounts = BTreeMap<Vec<Value>, u64>;

/// Count events per distinct compound key, skipping null keys
pub fn count_by(events: &[EnrichedEvent], dimensions: &[Dimension]) -> GroupCounts {
    let mut counts = GroupCounts::new();
    for event in events {
        let key: Vec<Value> = dimensions.iter().map(|d| d.value(event)).collect();
        if key.iter().any(Value::is_null) {
            continue;
        }
        *counts.entry(key).or_default() += 1;
    }
    counts
}

/// Highest-count group within each partition of the leading key components
///
/// `partition_len` leading components identify a partition (e.g. year, or
/// year + city); the winner of each partition is the group with the highest
/// count, ties going to the smallest key. Partitions come out ascending.
pub fn top_per_partition(counts: &GroupCounts, partition_len: usize) -> Vec<(Vec<Value>, u64)> {
    let mut winners: Vec<(Vec<Value>, u64)> = Vec::new();
    for (key, &count) in counts {
        let current = winners
            .last_mut()
            .filter(|(best_key, _)| best_key[..partition_len] == key[..partition_len]);
        if let Some((best_key, best_count)) = current {
            if count > *best_count {
                *best_key = key.clone();
                *best_count = count;
            }
            continue;
        }
        winners.push((key.clone(), count));
    }
    winners
}

/// Per year, the dimension value listened to most
///
/// Columns: `year, <dimension>, count`.
pub fn most_listened_by_year(events: &[EnrichedEvent], dimension: Dimension) -> ReportTable {
    let counts = count_by(events, &[Dimension::Year, dimension]);
    let mut table = ReportTable::new([
        Dimension::Year.column_name(),
        dimension.column_name(),
        COUNT_COLUMN,
    ]);
    for (key, count) in top_per_partition(&counts, 1) {
        let mut row = key;
        row.push(Value::from(count));
        table.push_row(row);
    }
    table
}

/// The single dimension value listened to most across all years
///
/// Columns: `<dimension>, count`; no rows when nothing could be grouped.
pub fn most_listened_overall(events: &[EnrichedEvent], dimension: Dimension) -> ReportTable {
    let counts = count_by(events, &[dimension]);
    let mut table = ReportTable::new([dimension.column_name(), COUNT_COLUMN]);
    if let Some((key, count)) = top_per_partition(&counts, 0).into_iter().next() {
        let mut row = key;
        row.push(Value::from(count));
        table.push_row(row);
    }
    table
}

/// Year × dimension-value count matrix
///
/// Columns: `year` then one column per distinct value (ascending); one row
/// per distinct year (ascending). Unobserved combinations are 0.
pub fn popularity_change_over_time(events: &[EnrichedEvent], dimension: Dimension) -> ReportTable {
    let counts = count_by(events, &[Dimension::Year, dimension]);

    let years: BTreeSet<&Value> = counts.keys().map(|key| &key[0]).collect();
    let values: BTreeSet<&Value> = counts.keys().map(|key| &key[1]).collect();
    let column_of: HashMap<&Value, usize> = values
        .iter()
        .enumerate()
        .map(|(i, value)| (*value, i + 1))
        .collect();

    let mut table = ReportTable::new(
        std::iter::once(Dimension::Year.column_name().to_string())
            .chain(values.iter().map(|value| value.to_string())),
    );

    let mut rows: BTreeMap<&Value, Vec<Value>> = years
        .iter()
        .map(|year| {
            let mut row = vec![Value::Int(0); values.len() + 1];
            row[0] = (*year).clone();
            (*year, row)
        })
        .collect();
    for (key, &count) in &counts {
        if let Some(row) = rows.get_mut(&key[0]) {
            row[column_of[&key[1]]] = Value::from(count);
        }
    }

    for row in rows.into_values() {
        table.push_row(row);
    }
    table
}

/// Every dimension value with its count, most listened first
///
/// Columns: `<dimension>, count`; equal counts keep ascending key order.
pub fn user_segmentation_analysis(events: &[EnrichedEvent], dimension: Dimension) -> ReportTable {
    let counts = count_by(events, &[dimension]);
    let mut groups: Vec<(Vec<Value>, u64)> = counts.into_iter().collect();
    // Stable sort keeps the ascending key order among equal counts
    groups.sort_by(|a, b| b.1.cmp(&a.1));

    let mut table = ReportTable::new([dimension.column_name(), COUNT_COLUMN]);
    for (key, count) in groups {
        let mut row = key;
        row.push(Value::from(count));
        table.push_row(row);
    }
    table
}

/// Per (year, city), the (singer, song) pair listened to most
///
/// Columns: `year, city, singer, song, count`, ordered by year then city.
pub fn most_listened_by_city_and_year(events: &[EnrichedEvent]) -> ReportTable {
    let dimensions = [
        Dimension::Year,
        Dimension::City,
        Dimension::Singer,
        Dimension::Song,
    ];
    let counts = count_by(events, &dimensions);

    let mut table = ReportTable::new(
        dimensions
            .iter()
            .map(|d| d.column_name())
            .chain(std::iter::once(COUNT_COLUMN)),
    );
    for (key, count) in top_per_partition(&counts, 2) {
        let mut row = key;
        row.push(Value::from(count));
        table.push_row(row);
    }
    table
}

/// Left-join `age` and `city` of the user named in `user_column`
///
/// Appends `age, city` columns. A user id with no user record gets nulls; a
/// user id held by several records repeats the row once per record.
pub fn attach_user_attributes(table: ReportTable, users: &[User], user_column: &str) -> ReportTable {
    let mut by_id: HashMap<i64, Vec<&User>> = HashMap::new();
    for user in users {
        by_id.entry(user.user_id).or_default().push(user);
    }

    let Some(index) = table.column_index(user_column) else {
        return table;
    };

    let mut joined = ReportTable::new(
        table
            .columns
            .iter()
            .cloned()
            .chain(["age".to_string(), "city".to_string()]),
    );
    for row in table.rows {
        let matches = row[index].as_int().and_then(|id| by_id.get(&id));
        match matches {
            Some(matched) => {
                for user in matched {
                    let mut extended = row.clone();
                    extended.push(Value::from(user.age));
                    extended.push(Value::from(user.city.as_str()));
                    joined.push_row(extended);
                }
            }
            None => {
                let mut extended = row;
                extended.push(Value::Null);
                extended.push(Value::Null);
                joined.push_row(extended);
            }
        }
    }
    joined
}
