//! Year selection for year buckets.
//!
//! A [`YearFilter`] either pins a single year, bounds an inclusive range (with
//! either end optional), or lets everything through. A single year that is
//! not in the library yields an empty selection, which callers treat as
//! "nothing to do" rather than as a failure.

use crate::grouping::YearBuckets;

/// Which years of the library to process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearFilter {
    /// Process only this year. Takes precedence over the range bounds.
    pub year: Option<i32>,
    /// First year of the range; defaults to the earliest year present.
    pub start_year: Option<i32>,
    /// Last year of the range; defaults to the latest year present.
    pub end_year: Option<i32>,
}

impl YearFilter {
    /// A filter that keeps every year.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn range(start_year: Option<i32>, end_year: Option<i32>) -> Self {
        Self {
            year: None,
            start_year,
            end_year,
        }
    }

    /// Whether no year flag is set, so every year passes.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.year.is_none() && self.start_year.is_none() && self.end_year.is_none()
    }
}

/// Narrows `years` according to `filter`.
///
/// - `year` set: only that year, or nothing if it is absent.
/// - `start_year`/`end_year` set: every present year in `[start, end]`, with a
///   missing bound resolved to the earliest/latest year present.
/// - otherwise: `years` unchanged.
pub fn filter_years(years: YearBuckets, filter: &YearFilter) -> YearBuckets {
    if filter.is_unfiltered() {
        return years;
    }

    if let Some(year) = filter.year {
        return years.into_iter().filter(|(y, _)| *y == year).collect();
    }

    let (Some(&first), Some(&last)) = (years.keys().next(), years.keys().next_back()) else {
        return years;
    };
    let start = filter.start_year.unwrap_or(first);
    let end = filter.end_year.unwrap_or(last);

    years
        .into_iter()
        .filter(|(year, _)| (start..=end).contains(year))
        .collect()
}
