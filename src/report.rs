//! Persisted year reports and the console summary.
//!
//! Every analysed year is written to `<output_dir>/analysis_<year>.json` as
//! pretty-printed JSON. The file holds one entry per bucket that was analysed
//! (`all` first, then months in calendar order) and a list of the buckets
//! that failed, if any.
//!
//! The [`Display`](std::fmt::Display) impl of [`YearReport`], also reachable
//! through [`render_summary`], produces the human-readable version printed at
//! the end of each year: the overall numbers, then the monthly breakdown.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::{AnalyzedBucket, MonthAnalysis};
use crate::grouping::BucketKey;
use crate::track::ClassifiedTrack;

/// A bucket that could not be analysed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketFailure {
    pub bucket: BucketKey,
    pub reason: String,
}

/// Everything persisted for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    pub year: i32,
    pub buckets: BTreeMap<BucketKey, AnalyzedBucket>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<BucketFailure>,
}

impl YearReport {
    #[must_use]
    pub fn new(year: i32) -> Self {
        Self {
            year,
            buckets: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn overall(&self) -> Option<&AnalyzedBucket> {
        self.buckets.get(&BucketKey::All)
    }

    /// The recorded failure of `bucket`, if it failed.
    #[must_use]
    pub fn failure(&self, bucket: BucketKey) -> Option<&BucketFailure> {
        self.failures.iter().find(|f| f.bucket == bucket)
    }

    /// Month buckets in calendar order.
    pub fn months(&self) -> impl Iterator<Item = (BucketKey, &AnalyzedBucket)> {
        self.buckets
            .iter()
            .filter(|(key, _)| !key.is_all())
            .map(|(key, bucket)| (*key, bucket))
    }
}

/// Path of the report for `year` inside `dir`.
#[must_use]
pub fn report_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("analysis_{year}.json"))
}

/// Writes `report` into `dir` and returns the file path.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_year_report(dir: &Path, report: &YearReport) -> Result<PathBuf> {
    let path = report_path(dir, report.year);
    let json = serde_json::to_string_pretty(report)
        .with_context(|| format!("Failed to serialize report for {}", report.year))?;
    fs::write(&path, json).with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(path)
}

/// Reads back a report written by [`write_year_report`].
///
/// # Errors
///
/// Returns an error if the file is missing or is not a valid report.
pub fn load_year_report(dir: &Path, year: i32) -> Result<YearReport> {
    let path = report_path(dir, year);
    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read report from {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid report in {}", path.display()))
}

fn track_line(track: &ClassifiedTrack) -> String {
    format!(
        "{} - {} ({}/100)",
        track.title(),
        track.entry.artist_line(),
        track.popularity
    )
}

fn write_analysis(out: &mut impl fmt::Write, analysis: &MonthAnalysis) -> fmt::Result {
    if analysis.is_empty() {
        return writeln!(out, "- no data");
    }

    writeln!(out, "- Number of liked songs: {}", analysis.track_count)?;
    writeln!(out, "- Average positivity score: {:.2}", analysis.average_positivity())?;
    writeln!(out, "- Average popularity score: {:.2}", analysis.average_popularity())?;
    writeln!(out, "- Overall sentiment: {}", analysis.sentiment)?;
    writeln!(
        out,
        "- Typical song: {} - {}",
        analysis.typical_track.title, analysis.typical_track.artist
    )?;
    if let Some(most) = &analysis.most_popular {
        writeln!(out, "- Most popular song: {}", track_line(most))?;
    }
    if let Some(least) = &analysis.least_popular {
        writeln!(out, "- Least popular song: {}", track_line(least))?;
    }
    if !analysis.excluded.is_empty() {
        writeln!(out, "- Left out: {} track(s)", analysis.excluded.len())?;
    }
    Ok(())
}

/// Console summary of a year: overall first, then months in calendar order.
impl fmt::Display for YearReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Summary for {}:", self.year)?;

        writeln!(f, "Overall:")?;
        match (self.overall(), self.failure(BucketKey::All)) {
            (Some(bucket), _) => write_analysis(f, &bucket.analysis)?,
            (None, Some(_)) => writeln!(f, "- analysis failed")?,
            (None, None) => writeln!(f, "- no data")?,
        }

        writeln!(f, "\nMonthly Breakdown:")?;
        for (key, bucket) in self.months() {
            writeln!(f, "{key}")?;
            write_analysis(f, &bucket.analysis)?;
        }

        if !self.failures.is_empty() {
            writeln!(f, "\nFailed buckets:")?;
            for failure in &self.failures {
                writeln!(f, "- {}: {}", failure.bucket, failure.reason)?;
            }
        }
        Ok(())
    }
}

/// Console summary of a year, as printed after its report is saved.
#[must_use]
pub fn render_summary(report: &YearReport) -> String {
    report.to_string()
}
