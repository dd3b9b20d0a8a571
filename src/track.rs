//! Track records as they move through the pipeline.
//!
//! A [`LibraryEntry`] is what the library source hands us: one liked track and
//! the instant it was liked. Once the classifier and the popularity lookup
//! have run, each entry becomes a [`ClassifiedTrack`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::taxonomy::Category;

/// One saved track from the user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub uri: String,
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    /// When the track was liked, as reported by the library (UTC).
    pub date_liked: DateTime<Utc>,
}

impl LibraryEntry {
    /// Artists joined the way they are shown to people and to the classifier.
    #[must_use]
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// Per-track metadata looked up from the library after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub id: String,
    pub name: String,
    /// Popularity on a 0-100 scale.
    pub popularity: u8,
    pub artists: Vec<String>,
}

/// A library entry enriched with its classification and popularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTrack {
    #[serde(flatten)]
    pub entry: LibraryEntry,
    pub category: Category,
    /// Tonal/lyrical sentiment in `[-100, 100]`.
    pub positivity: f64,
    /// Popularity in `[0, 100]`.
    pub popularity: u8,
}

impl ClassifiedTrack {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.entry.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.entry.title
    }
}
