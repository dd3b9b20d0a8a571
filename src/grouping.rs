//! # Time Bucketing
//!
//! Partitions a flat library into year buckets, and each year into month
//! buckets plus an `all` bucket holding the whole year.
//!
//! Years and months are calendar values of the like timestamp *in a given
//! timezone*. The convenience functions use the machine's local timezone; the
//! `_in` variants take one explicitly, which keeps tests deterministic.
//!
//! ## Invariants
//!
//! - Source order is preserved inside every bucket.
//! - Every entry of a year lands in exactly one month bucket, and in `all`.
//! - `all` is the year's list, unchanged.

use chrono::{DateTime, Datelike, Local, Month, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::track::LibraryEntry;

/// Year → entries liked that year, in source order.
pub type YearBuckets = BTreeMap<i32, Vec<LibraryEntry>>;

/// Bucket key → entries, for a single year.
pub type MonthBuckets = BTreeMap<BucketKey, Vec<LibraryEntry>>;

/// Key of a bucket inside a year: the whole year, or one calendar month.
///
/// Ordering puts [`BucketKey::All`] first, then months in calendar order, so
/// iterating a `BTreeMap<BucketKey, _>` yields report order directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKey {
    All,
    Month(Month),
}

impl BucketKey {
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, BucketKey::All)
    }

    /// Position in report order: `all` is 0, January is 1, December is 12.
    #[must_use]
    pub fn ordinal(&self) -> u32 {
        match self {
            BucketKey::All => 0,
            BucketKey::Month(month) => month.number_from_month(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKey::All => "all",
            BucketKey::Month(month) => month.name(),
        }
    }
}

impl Ord for BucketKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for BucketKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a string that is neither `all` nor an English month name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bucket `{0}`, expected `all` or a month name")]
pub struct ParseBucketKeyError(String);

impl FromStr for BucketKey {
    type Err = ParseBucketKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(BucketKey::All);
        }
        s.parse::<Month>()
            .map(BucketKey::Month)
            .map_err(|_| ParseBucketKeyError(s.to_string()))
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BucketKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Month of a calendar date, as a chrono [`Month`].
fn month_of<Tz: TimeZone>(date: &DateTime<Tz>) -> Month {
    // `month()` is always 1..=12
    Month::try_from(date.month() as u8).unwrap_or(Month::January)
}

/// Groups entries by the calendar year they were liked, in local time.
pub fn group_by_year(entries: impl IntoIterator<Item = LibraryEntry>) -> YearBuckets {
    group_by_year_in(entries, &Local)
}

/// Groups entries by the calendar year they were liked in `tz`.
pub fn group_by_year_in<Tz: TimeZone>(
    entries: impl IntoIterator<Item = LibraryEntry>,
    tz: &Tz,
) -> YearBuckets {
    entries.into_iter().fold(YearBuckets::new(), |mut years, entry| {
        let year = entry.date_liked.with_timezone(tz).year();
        years.entry(year).or_default().push(entry);
        years
    })
}

/// Splits every year into month buckets plus `all`, in local time.
pub fn group_by_month(years: &YearBuckets) -> BTreeMap<i32, MonthBuckets> {
    group_by_month_in(years, &Local)
}

/// Splits every year into month buckets plus `all`, using `tz` for months.
pub fn group_by_month_in<Tz: TimeZone>(
    years: &YearBuckets,
    tz: &Tz,
) -> BTreeMap<i32, MonthBuckets> {
    years
        .iter()
        .map(|(&year, entries)| (year, split_year(entries, tz)))
        .collect()
}

fn split_year<Tz: TimeZone>(entries: &[LibraryEntry], tz: &Tz) -> MonthBuckets {
    let mut buckets = MonthBuckets::new();
    buckets.insert(BucketKey::All, entries.to_vec());

    entries.iter().fold(buckets, |mut buckets, entry| {
        let month = month_of(&entry.date_liked.with_timezone(tz));
        buckets
            .entry(BucketKey::Month(month))
            .or_default()
            .push(entry.clone());
        buckets
    })
}
