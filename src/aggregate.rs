//! Per-bucket statistics over classified tracks.
//!
//! A bucket's [`MonthAnalysis`] keeps running sums rather than averages.
//! Averages are derived on read and are `0` for a bucket with no tracks, so a
//! bucket that lost every track still reports cleanly.
//!
//! The most and least popular tracks start out as "no value yet" and are set
//! by the first track seen, not by comparison against a sentinel score. Ties
//! keep the earlier track.

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierTrack;
use crate::taxonomy::Category;
use crate::track::ClassifiedTrack;

/// Summary statistics of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthAnalysis {
    /// Overall category the classifier chose for the bucket.
    pub sentiment: Category,
    pub typical_track: ClassifierTrack,
    pub most_popular: Option<ClassifiedTrack>,
    pub least_popular: Option<ClassifiedTrack>,
    /// Sum of popularity over `track_count` tracks.
    pub popularity: u32,
    /// Sum of positivity over `track_count` tracks.
    pub positivity: f64,
    pub track_count: usize,
    /// Ids of submitted tracks left out of the statistics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<String>,
}

impl MonthAnalysis {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.track_count == 0
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_popularity(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            f64::from(self.popularity) / self.track_count as f64
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_positivity(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.positivity / self.track_count as f64
        }
    }
}

/// Classified tracks of a bucket together with their statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedBucket {
    pub tracks: Vec<ClassifiedTrack>,
    pub analysis: MonthAnalysis,
}

/// Running popularity extremes.
#[derive(Debug, Clone, Copy, Default)]
struct PopularityFold<'a> {
    most: Option<&'a ClassifiedTrack>,
    least: Option<&'a ClassifiedTrack>,
    sum: u32,
}

impl<'a> PopularityFold<'a> {
    fn step(self, track: &'a ClassifiedTrack) -> Self {
        let most = match self.most {
            Some(best) if best.popularity >= track.popularity => Some(best),
            _ => Some(track),
        };
        let least = match self.least {
            Some(worst) if worst.popularity <= track.popularity => Some(worst),
            _ => Some(track),
        };
        Self {
            most,
            least,
            sum: self.sum + u32::from(track.popularity),
        }
    }
}

/// Builds the statistics of one bucket.
#[must_use]
pub fn aggregate(
    tracks: Vec<ClassifiedTrack>,
    sentiment: Category,
    typical_track: ClassifierTrack,
) -> AnalyzedBucket {
    let fold = tracks
        .iter()
        .fold(PopularityFold::default(), PopularityFold::step);
    let positivity = tracks.iter().map(|t| t.positivity).sum::<f64>();

    let analysis = MonthAnalysis {
        sentiment,
        typical_track,
        most_popular: fold.most.cloned(),
        least_popular: fold.least.cloned(),
        popularity: fold.sum,
        positivity,
        track_count: tracks.len(),
        excluded: Vec::new(),
    };

    AnalyzedBucket { tracks, analysis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::LibraryEntry;
    use chrono::{TimeZone, Utc};

    fn track(id: &str, popularity: u8, positivity: f64) -> ClassifiedTrack {
        ClassifiedTrack {
            entry: LibraryEntry {
                uri: format!("spotify:track:{id}"),
                id: id.to_string(),
                title: format!("Title {id}"),
                artists: vec!["Artist".to_string()],
                date_liked: Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap(),
            },
            category: Category::Energetic,
            positivity,
            popularity,
        }
    }

    fn typical() -> ClassifierTrack {
        ClassifierTrack {
            id: "a".into(),
            title: "Title a".into(),
            artist: "Artist".into(),
            category: Category::Energetic,
            positivity: 10.0,
        }
    }

    #[test]
    fn test_extremes_and_average() {
        let tracks = vec![track("a", 10, 20.0), track("b", 90, -40.0), track("c", 50, 50.0)];
        let bucket = aggregate(tracks, Category::Energetic, typical());
        let analysis = &bucket.analysis;

        assert_eq!(analysis.track_count, 3);
        assert_eq!(analysis.popularity, 150);
        assert_eq!(analysis.most_popular.as_ref().unwrap().id(), "b");
        assert_eq!(analysis.least_popular.as_ref().unwrap().id(), "a");
        assert!((analysis.average_popularity() - 50.0).abs() < f64::EPSILON);
        assert!((analysis.average_positivity() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_bucket_has_zero_averages() {
        let bucket = aggregate(Vec::new(), Category::Calm, typical());
        let analysis = &bucket.analysis;

        assert!(analysis.is_empty());
        assert!(analysis.most_popular.is_none());
        assert!(analysis.least_popular.is_none());
        assert_eq!(analysis.average_popularity(), 0.0);
        assert_eq!(analysis.average_positivity(), 0.0);
    }

    #[test]
    fn test_single_zero_popularity_track_sets_both_extremes() {
        let bucket = aggregate(vec![track("only", 0, 0.0)], Category::Calm, typical());
        assert_eq!(bucket.analysis.most_popular.as_ref().unwrap().id(), "only");
        assert_eq!(bucket.analysis.least_popular.as_ref().unwrap().id(), "only");
    }

    #[test]
    fn test_ties_keep_first_track() {
        let tracks = vec![track("first", 70, 0.0), track("second", 70, 0.0)];
        let bucket = aggregate(tracks, Category::Calm, typical());
        assert_eq!(bucket.analysis.most_popular.as_ref().unwrap().id(), "first");
        assert_eq!(bucket.analysis.least_popular.as_ref().unwrap().id(), "first");
    }

    #[test]
    fn test_extremes_bound_every_track() {
        let pops = [33u8, 7, 100, 64, 7, 0, 99];
        let tracks: Vec<_> = pops
            .iter()
            .enumerate()
            .map(|(i, &p)| track(&i.to_string(), p, 0.0))
            .collect();
        let bucket = aggregate(tracks, Category::Calm, typical());

        let most = bucket.analysis.most_popular.as_ref().unwrap().popularity;
        let least = bucket.analysis.least_popular.as_ref().unwrap().popularity;
        for t in &bucket.tracks {
            assert!(least <= t.popularity && t.popularity <= most);
        }
        assert_eq!((most, least), (100, 0));
    }

    #[test]
    fn test_empty_analysis_serializes_null_extremes() {
        let bucket = aggregate(Vec::new(), Category::Calm, typical());
        let value = serde_json::to_value(&bucket.analysis).unwrap();
        assert!(value["mostPopular"].is_null());
        assert!(value["leastPopular"].is_null());
        assert!(value.get("excluded").is_none());
    }
}
