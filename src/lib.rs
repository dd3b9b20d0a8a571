//! Year-by-year mood reports and playlists for a Spotify liked-songs library.
//!
//! Core modules:
//! - [`grouping`] - Buckets liked songs by year and month
//! - [`range_filter`] - Narrows year buckets to a year or a year range
//! - [`orchestrator`] - Classifies a bucket and merges popularity by track id
//! - [`aggregate`] - Sums, extremes and averages per bucket
//! - [`report`] - Per-year JSON reports and the console summary
//! - [`pipeline`] - Analyze mode end to end
//! - [`playlists`] - Organize and clear modes
//!
//! ### Supporting Modules
//!
//! - [`classifier`] - Classifier trait, response schema and the OpenAI client
//! - [`library`] / [`spotify`] - Library traits and the Spotify client
//! - [`taxonomy`] - The ten mood categories
//! - [`track`] - Track records as they move through the pipeline
//! - [`error`] - Error types
//! - [`config`] - Run configuration and the output directory
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use moodlog::classifier::OpenAiClassifier;
//! use moodlog::config::{ClassifierSettings, SpotifyCredentials, CLASSIFIER_TEMPERATURE};
//! use moodlog::library::LibrarySource;
//! use moodlog::pipeline::{analyze, AnalyzeOptions};
//! use moodlog::range_filter::YearFilter;
//! use moodlog::spotify::SpotifyClient;
//! use std::time::Duration;
//!
//! let timeout = Duration::from_secs(120);
//! let spotify = SpotifyClient::connect(
//!     &SpotifyCredentials {
//!         client_id: "client-id".into(),
//!         client_secret: "client-secret".into(),
//!         refresh_token: "refresh-token".into(),
//!     },
//!     timeout,
//! )?;
//! let classifier = OpenAiClassifier::new(
//!     ClassifierSettings {
//!         base_url: "https://api.openai.com/v1".into(),
//!         model: "gpt-4o-2024-08-06".into(),
//!         api_key: "sk-...".into(),
//!         temperature: CLASSIFIER_TEMPERATURE,
//!     },
//!     timeout,
//! );
//!
//! let entries = spotify.fetch_all_saved_entries()?;
//! let options = AnalyzeOptions {
//!     filter: YearFilter::single(2023),
//!     output_dir: "analysis".into(),
//!     workers: 8,
//! };
//! let summary = analyze(entries, &spotify, &classifier, &options)?;
//! println!("Wrote {} reports", summary.written.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Buckets
//!
//! Each year is split into twelve month buckets plus an `all` bucket holding
//! the whole year. Every non-empty bucket is classified as one batch, so a
//! year with songs in three months costs four classifier requests.
//!
//! ## Error Handling
//!
//! Collaborators return typed errors ([`error::ServiceError`],
//! [`error::ClassifyError`]). The pipeline contains failures per bucket and
//! reports them in the year's report; only setup failures surface as
//! `anyhow::Error`.

pub mod aggregate;
pub mod classifier;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod grouping;
pub mod library;
pub mod orchestrator;
pub mod pipeline;
pub mod playlists;
pub mod range_filter;
pub mod report;
pub mod spotify;
pub mod taxonomy;
pub mod track;
