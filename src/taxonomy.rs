//! # Mood Taxonomy
//!
//! The closed set of ten mood categories a track (or a whole bucket of
//! tracks) can be classified into. Each category carries a short description
//! of its energy, sentiment and tempo. The descriptions are only ever shown
//! to the classifier as guidance; no runtime logic depends on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A mood label assigned by the classifier.
///
/// Serialized as the bare variant name (`"Energetic"`, `"Sad"`, ...), which is
/// also the spelling the classifier is constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Energetic,
    Sad,
    Relaxed,
    Happy,
    Mellow,
    Intense,
    Hopeful,
    Nostalgic,
    Calm,
    Uplifted,
}

impl Category {
    /// Every category, in the order they are presented to the classifier.
    pub const ALL: [Category; 10] = [
        Category::Energetic,
        Category::Sad,
        Category::Relaxed,
        Category::Happy,
        Category::Mellow,
        Category::Intense,
        Category::Hopeful,
        Category::Nostalgic,
        Category::Calm,
        Category::Uplifted,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Category::Energetic => "Energetic",
            Category::Sad => "Sad",
            Category::Relaxed => "Relaxed",
            Category::Happy => "Happy",
            Category::Mellow => "Mellow",
            Category::Intense => "Intense",
            Category::Hopeful => "Hopeful",
            Category::Nostalgic => "Nostalgic",
            Category::Calm => "Calm",
            Category::Uplifted => "Uplifted",
        }
    }

    /// Classifier guidance for this category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Category::Energetic => "High energy, high sentiment, fast tempo (120+)",
            Category::Sad => "Low energy, low sentiment, slow tempo (below 80)",
            Category::Relaxed => "Low energy, high sentiment, slow tempo (below 80)",
            Category::Happy => "High energy, high sentiment, moderate-fast tempo (100-120)",
            Category::Mellow => "Low energy, low sentiment, slow tempo (below 80)",
            Category::Intense => "High energy, low sentiment, fast tempo (110+)",
            Category::Hopeful => "Moderate energy, moderate sentiment, moderate tempo (90-120)",
            Category::Nostalgic => "Low-moderate energy, low sentiment, slow tempo (below 90)",
            Category::Calm => "Low energy, neutral sentiment, slow tempo (below 100)",
            Category::Uplifted => {
                "Moderate-high energy, moderate-high sentiment, moderate tempo (100+)"
            }
        }
    }

    /// Category names as a list, used for the `enum` constraint of the
    /// response schema.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
