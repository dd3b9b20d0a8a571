//! # Analysis Pipeline
//!
//! Runs analyze mode end to end over an already fetched library:
//!
//! ```text
//! entries -> group_by_year -> filter_years -> group_by_month
//!         -> per bucket: enrich -> aggregate
//!         -> per year: write report, print summary
//! ```
//!
//! Years and buckets are processed one at a time. A bucket that fails is
//! logged with its year and name, recorded in the year's report and skipped;
//! the rest of the run carries on. A bucket with no tracks is never sent to
//! the classifier.
//!
//! # Errors
//!
//! Only setup problems are returned: an output directory that cannot be
//! created or a worker pool that cannot be started. A report that fails to
//! write is logged and the run continues with the next year.

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use log::{error, info, warn};
use std::path::PathBuf;

use crate::aggregate::{aggregate, AnalyzedBucket};
use crate::classifier::Classifier;
use crate::config::ensure_output_dir;
use crate::error::AnalysisError;
use crate::grouping::{group_by_month_in, group_by_year_in, MonthBuckets};
use crate::library::LibrarySource;
use crate::orchestrator::ClassificationOrchestrator;
use crate::range_filter::{filter_years, YearFilter};
use crate::report::{render_summary, write_year_report, BucketFailure, YearReport};
use crate::track::LibraryEntry;

/// Settings for [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub filter: YearFilter,
    pub output_dir: PathBuf,
    pub workers: usize,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Reports in year order, whether or not they were written successfully.
    pub reports: Vec<YearReport>,
    /// Paths of the reports written to disk.
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    /// Number of buckets that failed across all years.
    #[must_use]
    pub fn failed_buckets(&self) -> usize {
        self.reports.iter().map(|r| r.failures.len()).sum()
    }
}

/// Analyzes `entries` with months and years taken in local time.
///
/// # Errors
///
/// See the module documentation.
pub fn analyze(
    entries: Vec<LibraryEntry>,
    library: &dyn LibrarySource,
    classifier: &dyn Classifier,
    options: &AnalyzeOptions,
) -> Result<RunSummary> {
    analyze_in(entries, library, classifier, options, &Local)
}

/// Analyzes `entries` with months and years taken in `tz`.
///
/// # Errors
///
/// See the module documentation.
pub fn analyze_in<Tz: TimeZone>(
    entries: Vec<LibraryEntry>,
    library: &dyn LibrarySource,
    classifier: &dyn Classifier,
    options: &AnalyzeOptions,
    tz: &Tz,
) -> Result<RunSummary> {
    let output_dir = ensure_output_dir(&options.output_dir)?;
    let orchestrator = ClassificationOrchestrator::new(classifier, library, options.workers)
        .context("Failed to start the lookup worker pool")?;

    let years = filter_years(group_by_year_in(entries, tz), &options.filter);
    if years.is_empty() {
        warn!("No liked songs in the selected years");
    }
    let by_month = group_by_month_in(&years, tz);

    let mut summary = RunSummary::default();
    for (year, buckets) in by_month {
        info!("Processing {year}...");
        let report = analyze_year(&orchestrator, year, &buckets);

        match write_year_report(&output_dir, &report) {
            Ok(path) => {
                info!("Saved report to {}", path.display());
                summary.written.push(path);
            }
            Err(e) => error!("Could not save report for {year}: {e:#}"),
        }

        println!("\n{}", render_summary(&report));
        summary.reports.push(report);
    }

    Ok(summary)
}

fn analyze_year(orchestrator: &ClassificationOrchestrator<'_>, year: i32, buckets: &MonthBuckets) -> YearReport {
    let mut report = YearReport::new(year);

    for (&key, tracks) in buckets {
        if tracks.is_empty() {
            continue;
        }
        info!("Analyzing {year} {key}: {} tracks", tracks.len());

        match analyze_bucket(orchestrator, tracks) {
            Ok(bucket) => {
                report.buckets.insert(key, bucket);
            }
            Err(e) => {
                error!("Skipping {year} {key}: {e}");
                report.failures.push(BucketFailure {
                    bucket: key,
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

fn analyze_bucket(
    orchestrator: &ClassificationOrchestrator<'_>,
    tracks: &[LibraryEntry],
) -> Result<AnalyzedBucket, AnalysisError> {
    let enriched = orchestrator.enrich(tracks)?;
    let excluded = enriched.excluded_ids();

    let mut bucket = aggregate(enriched.tracks, enriched.sentiment, enriched.typical_track);
    bucket.analysis.excluded = excluded;
    Ok(bucket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassificationResult, ClassifierTrack};
    use crate::grouping::BucketKey;
    use crate::error::{ClassifyError, ServiceError};
    use crate::taxonomy::Category;
    use crate::track::TrackMetadata;
    use chrono::{Month, Utc};
    use std::sync::Mutex;

    fn entry(id: &str, year: i32, month: u32) -> LibraryEntry {
        LibraryEntry {
            uri: format!("spotify:track:{id}"),
            id: id.to_string(),
            title: format!("Song {id}"),
            artists: vec!["Band".to_string()],
            date_liked: Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap(),
        }
    }

    /// Counts requests; every track is Calm with positivity 0.
    struct CountingClassifier {
        batches: Mutex<Vec<usize>>,
    }

    impl Classifier for CountingClassifier {
        fn name(&self) -> &str {
            "counting"
        }

        fn classify(&self, tracks: &[LibraryEntry]) -> Result<ClassificationResult, ClassifyError> {
            self.batches.lock().unwrap().push(tracks.len());
            let classified: Vec<_> = tracks
                .iter()
                .map(|t| ClassifierTrack {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    artist: t.artist_line(),
                    category: Category::Calm,
                    positivity: 0.0,
                })
                .collect();
            Ok(ClassificationResult {
                typical_track: classified[0].clone(),
                tracks: classified,
                sentiment: Category::Calm,
            })
        }
    }

    struct FlatLibrary;

    impl LibrarySource for FlatLibrary {
        fn fetch_all_saved_entries(&self) -> Result<Vec<LibraryEntry>, ServiceError> {
            Ok(Vec::new())
        }

        fn fetch_track_metadata(&self, id: &str) -> Result<TrackMetadata, ServiceError> {
            Ok(TrackMetadata {
                id: id.to_string(),
                name: String::new(),
                popularity: 50,
                artists: Vec::new(),
            })
        }
    }

    #[test]
    fn test_one_request_per_non_empty_bucket() {
        let temp = tempfile::tempdir().unwrap();
        let classifier = CountingClassifier {
            batches: Mutex::new(Vec::new()),
        };
        let options = AnalyzeOptions {
            filter: YearFilter::all(),
            output_dir: temp.path().to_path_buf(),
            workers: 2,
        };
        let entries = vec![entry("a", 2022, 1), entry("b", 2022, 1), entry("c", 2022, 6)];

        let summary = analyze_in(entries, &FlatLibrary, &classifier, &options, &Utc).unwrap();

        // all, January, June
        assert_eq!(*classifier.batches.lock().unwrap(), vec![3, 2, 1]);
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.written, vec![temp.path().join("analysis_2022.json")]);
        assert_eq!(
            summary.reports[0].buckets.keys().copied().collect::<Vec<_>>(),
            vec![BucketKey::All, BucketKey::Month(Month::January), BucketKey::Month(Month::June)]
        );
        assert_eq!(summary.failed_buckets(), 0);
    }

    #[test]
    fn test_filter_limits_years_written() {
        let temp = tempfile::tempdir().unwrap();
        let classifier = CountingClassifier {
            batches: Mutex::new(Vec::new()),
        };
        let options = AnalyzeOptions {
            filter: YearFilter::single(2021),
            output_dir: temp.path().join("out"),
            workers: 1,
        };
        let entries = vec![entry("a", 2020, 3), entry("b", 2021, 4), entry("c", 2022, 5)];

        let summary = analyze_in(entries, &FlatLibrary, &classifier, &options, &Utc).unwrap();

        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].year, 2021);
        assert!(temp.path().join("out").join("analysis_2021.json").is_file());
        assert!(!temp.path().join("out").join("analysis_2020.json").exists());
    }
}
