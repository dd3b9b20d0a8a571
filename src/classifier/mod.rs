//! Mood classification of track batches.
//!
//! A [`Classifier`] takes the tracks of one bucket and returns a
//! [`ClassificationResult`]: a category and positivity score per track, an
//! overall category for the batch and a track that best represents it.
//!
//! Answers are held to a closed schema ([`response_schema`]). Parsing goes
//! through [`parse_classification`], which rejects anything outside it:
//! missing or extra fields, labels outside the taxonomy, and positivity
//! scores that are not finite numbers in `[-100, 100]`.

mod openai;

pub use openai::OpenAiClassifier;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ClassifyError;
use crate::taxonomy::Category;
use crate::track::LibraryEntry;

/// Bounds of the positivity scale.
pub const POSITIVITY_RANGE: std::ops::RangeInclusive<f64> = -100.0..=100.0;

/// System prompt sent with every classification request.
pub const SYSTEM_PROMPT: &str = "You are a music sentiment categorization assistant.";

/// One classified track, as the classifier returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierTrack {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub category: Category,
    pub positivity: f64,
}

/// Classifier answer for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassificationResult {
    pub tracks: Vec<ClassifierTrack>,
    pub sentiment: Category,
    pub typical_track: ClassifierTrack,
}

/// Classifies a batch of tracks in a single request.
pub trait Classifier: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &str;

    /// Classifies every track of `tracks` in one request.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::SchemaViolation`] when the answer does not fit
    /// the response schema, and [`ClassifyError::Service`] when the service
    /// cannot be reached or fails.
    fn classify(&self, tracks: &[LibraryEntry]) -> Result<ClassificationResult, ClassifyError>;
}

fn track_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "artist": { "type": "string" },
            "id": { "type": "string" },
            "category": { "type": "string", "enum": Category::names() },
            "positivity": { "type": "number" }
        },
        "required": ["title", "artist", "id", "category", "positivity"],
        "additionalProperties": false
    })
}

/// JSON schema the classifier's answer must follow.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "tracks": { "type": "array", "items": track_schema() },
            "sentiment": { "type": "string", "enum": Category::names() },
            "typicalTrack": track_schema()
        },
        "required": ["tracks", "sentiment", "typicalTrack"],
        "additionalProperties": false
    })
}

/// User prompt for one batch.
#[must_use]
pub fn build_prompt(tracks: &[LibraryEntry]) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("- {}: {}", c.name(), c.description()))
        .collect::<Vec<_>>()
        .join("\n");

    let songs = tracks
        .iter()
        .map(|t| format!("- {} by {} with id: {}", t.title, t.artist_line(), t.id))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Categorize the following songs based on their sentiment and energy. \
Use the following categories and descriptions:\n{categories}\n\n\
Also assign them a numerical positivity score ranging from extremely positive at 100 points \
to extremely negative at -100 points. This should be based on the tone and lyrical content of the song.\n\n\
Songs to categorize:\n{songs}\n\n\
Then categorize the list as a whole into one of the categories above, and choose a song from the list \
that best fits the overall categorization.\n\n\
Be concise."
    )
}

/// Parses and validates a classifier answer.
///
/// # Errors
///
/// Returns [`ClassifyError::SchemaViolation`] describing the first problem.
pub fn parse_classification(content: &str) -> Result<ClassificationResult, ClassifyError> {
    let result: ClassificationResult = serde_json::from_str(content)
        .map_err(|e| ClassifyError::SchemaViolation(e.to_string()))?;

    for track in result.tracks.iter().chain(std::iter::once(&result.typical_track)) {
        check_positivity(track)?;
    }

    Ok(result)
}

fn check_positivity(track: &ClassifierTrack) -> Result<(), ClassifyError> {
    if track.positivity.is_finite() && POSITIVITY_RANGE.contains(&track.positivity) {
        Ok(())
    } else {
        Err(ClassifyError::SchemaViolation(format!(
            "positivity {} of track {} is outside [-100, 100]",
            track.positivity, track.id
        )))
    }
}
