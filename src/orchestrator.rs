//! Classification and enrichment of one bucket.
//!
//! A bucket goes through three steps:
//!
//! 1. the whole track list is sent to the [`Classifier`] as one request and
//!    the answer is validated;
//! 2. popularity is looked up for every submitted track, in parallel on the
//!    orchestrator's own worker pool;
//! 3. the classifier answer and the popularity lookups are merged back onto
//!    the submitted tracks by id ([`merge_classifications`]).
//!
//! Step 3 only starts once every lookup of step 2 has finished. A failure in
//! step 1 or 2 abandons the bucket; disagreements found in step 3 are
//! reported as [`MergeMismatch`]es and only drop the affected tracks.

use log::{debug, warn};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::classifier::{ClassificationResult, Classifier, ClassifierTrack};
use crate::error::{AnalysisError, MergeMismatch, ServiceError};
use crate::library::LibrarySource;
use crate::taxonomy::Category;
use crate::track::{ClassifiedTrack, LibraryEntry};

/// Output of [`ClassificationOrchestrator::enrich`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBucket {
    /// Merged tracks, in submission order.
    pub tracks: Vec<ClassifiedTrack>,
    pub sentiment: Category,
    pub typical_track: ClassifierTrack,
    pub mismatches: Vec<MergeMismatch>,
}

impl EnrichedBucket {
    /// Ids of submitted tracks that did not make it into `tracks`.
    #[must_use]
    pub fn excluded_ids(&self) -> Vec<String> {
        self.mismatches
            .iter()
            .filter(|m| m.excludes_track())
            .map(|m| m.id().to_string())
            .collect()
    }
}

/// Drives classification and popularity lookups for buckets.
pub struct ClassificationOrchestrator<'a> {
    classifier: &'a dyn Classifier,
    library: &'a dyn LibrarySource,
    pool: rayon::ThreadPool,
}

impl<'a> ClassificationOrchestrator<'a> {
    /// Creates an orchestrator with a lookup pool of `workers` threads.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread pool cannot be created.
    pub fn new(
        classifier: &'a dyn Classifier,
        library: &'a dyn LibrarySource,
        workers: usize,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("moodlog-lookup-{i}"))
            .build()?;
        Ok(Self {
            classifier,
            library,
            pool,
        })
    }

    /// Classifies `tracks` and attaches popularity to each of them.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::SchemaViolation`] if the classifier answer is rejected
    /// - [`AnalysisError::ExternalService`] if the classifier or any popularity
    ///   lookup fails
    pub fn enrich(&self, tracks: &[LibraryEntry]) -> Result<EnrichedBucket, AnalysisError> {
        debug!(
            "Sending {} tracks to classifier {}",
            tracks.len(),
            self.classifier.name()
        );
        let classification = self.classifier.classify(tracks)?;

        let popularity = self
            .fetch_popularity(tracks)
            .map_err(|source| AnalysisError::ExternalService {
                stage: "popularity lookup".to_string(),
                source,
            })?;

        let (merged, mismatches) = merge_classifications(tracks, &classification, &popularity);

        Ok(EnrichedBucket {
            tracks: merged,
            sentiment: classification.sentiment,
            typical_track: classification.typical_track,
            mismatches,
        })
    }

    fn fetch_popularity(&self, tracks: &[LibraryEntry]) -> Result<HashMap<String, u8>, ServiceError> {
        let library = self.library;
        self.pool.install(|| {
            tracks
                .par_iter()
                .map(|entry| {
                    library
                        .fetch_track_metadata(&entry.id)
                        .map(|metadata| (entry.id.clone(), metadata.popularity.min(100)))
                })
                .collect()
        })
    }
}

/// Joins classifier output and popularity onto the submitted tracks by id.
///
/// Returns the merged tracks in submission order plus every disagreement
/// found. When the classifier repeats an id, its first entry is used.
///
/// Tracks absent from `popularity` are reported as
/// [`MergeMismatch::MissingMetadata`]. [`ClassificationOrchestrator::enrich`]
/// always passes a complete map, so that case needs a direct call.
pub fn merge_classifications(
    tracks: &[LibraryEntry],
    classification: &ClassificationResult,
    popularity: &HashMap<String, u8>,
) -> (Vec<ClassifiedTrack>, Vec<MergeMismatch>) {
    let mut mismatches = Vec::new();

    let mut by_id: HashMap<&str, &ClassifierTrack> = HashMap::with_capacity(classification.tracks.len());
    for classified in &classification.tracks {
        by_id.entry(classified.id.as_str()).or_insert(classified);
    }

    let submitted: HashSet<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    for id in by_id.keys().filter(|id| !submitted.contains(*id)) {
        let mismatch = MergeMismatch::UnknownId { id: (*id).to_string() };
        warn!("{mismatch}");
        mismatches.push(mismatch);
    }
    // HashMap iteration order is unspecified
    mismatches.sort_by(|a, b| a.id().cmp(b.id()));

    let mut merged = Vec::with_capacity(tracks.len());
    for entry in tracks {
        let Some(classified) = by_id.get(entry.id.as_str()) else {
            let mismatch = MergeMismatch::MissingClassification {
                id: entry.id.clone(),
                title: entry.title.clone(),
            };
            warn!("{mismatch}");
            mismatches.push(mismatch);
            continue;
        };

        let Some(&popularity) = popularity.get(&entry.id) else {
            let mismatch = MergeMismatch::MissingMetadata { id: entry.id.clone() };
            warn!("{mismatch}");
            mismatches.push(mismatch);
            continue;
        };

        merged.push(ClassifiedTrack {
            entry: entry.clone(),
            category: classified.category,
            positivity: classified.positivity,
            popularity,
        });
    }

    (merged, mismatches)
}
