//! # Configuration Module
//!
//! Turns parsed command-line arguments (which already folded in the
//! environment variables) into the plain settings the rest of the crate uses,
//! and prepares the report output directory.
//!
//! ## Credentials
//!
//! | Variable | Needed for |
//! |---|---|
//! | `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `SPOTIFY_REFRESH_TOKEN` | every mode |
//! | `OPENAI_API_KEY` | `--analyze` |
//!
//! Missing credentials are reported by name before any network traffic.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Args, Mode};
use crate::range_filter::YearFilter;

/// Directory reports are written to unless `--output-dir` says otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "analysis";

/// Chat model used for classification by default.
pub const DEFAULT_MODEL: &str = "gpt-4o-2024-08-06";

/// OpenAI-compatible API root used by default.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Sampling temperature for classification requests.
pub const CLASSIFIER_TEMPERATURE: f32 = 0.3;

/// Client credentials plus the long-lived refresh token.
#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Where and how to reach the classifier.
#[derive(Clone)]
pub struct ClassifierSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
}

impl std::fmt::Debug for ClassifierSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

/// Configuration for one run.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub mode: Mode,
    pub filter: YearFilter,
    pub output_dir: PathBuf,
    /// Worker threads for per-track popularity lookups.
    pub workers: usize,
    /// Timeout applied to every HTTP request.
    pub timeout: Duration,
    pub spotify: SpotifyCredentials,
    /// Present only in analyze mode.
    pub classifier: Option<ClassifierSettings>,
}

impl RuntimeConfig {
    /// Builds the run configuration from parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing credential.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mode = args.mode();

        let spotify = SpotifyCredentials {
            client_id: required(&args.spotify_client_id, "SPOTIFY_CLIENT_ID")?,
            client_secret: required(&args.spotify_client_secret, "SPOTIFY_CLIENT_SECRET")?,
            refresh_token: required(&args.spotify_refresh_token, "SPOTIFY_REFRESH_TOKEN")?,
        };

        let classifier = match mode {
            Mode::Analyze => Some(ClassifierSettings {
                base_url: args.openai_base_url.trim_end_matches('/').to_string(),
                model: args.model.clone(),
                api_key: required(&args.openai_api_key, "OPENAI_API_KEY")?,
                temperature: CLASSIFIER_TEMPERATURE,
            }),
            Mode::ClearLikes | Mode::Organize => None,
        };

        Ok(Self {
            mode,
            filter: args.year_filter(),
            output_dir: args.output_dir.clone(),
            workers: args.workers.max(1),
            timeout: Duration::from_secs(args.timeout_secs),
            spotify,
            classifier,
        })
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("{name} is not set. Export it or pass the matching flag."))
}

/// Creates the report directory if needed and returns it.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, e.g. because of
/// permissions or a read-only filesystem.
pub fn ensure_output_dir(path: &Path) -> Result<PathBuf> {
    fs::create_dir_all(path).with_context(|| {
        format!(
            "Failed to create report directory at {}. Please check file permissions.",
            path.display()
        )
    })?;
    Ok(path.to_path_buf())
}
