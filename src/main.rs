//! # Moodlog
//!
//! Year-by-year mood reports and playlists for your Spotify liked songs.
//!
//! ## Modes
//!
//! - `moodlog --analyze`: classify every month of every selected year and
//!   write `analysis_<year>.json` reports plus a console summary
//! - `moodlog --clear-likes`: remove all liked songs
//! - `moodlog`: create a `Liked Songs <year>` playlist per selected year
//!
//! ## Usage
//!
//! ```bash
//! export SPOTIFY_CLIENT_ID=... SPOTIFY_CLIENT_SECRET=... SPOTIFY_REFRESH_TOKEN=...
//! export OPENAI_API_KEY=...
//!
//! moodlog --analyze --start-year 2021
//! moodlog --year 2023
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{error, info};

use moodlog::classifier::OpenAiClassifier;
use moodlog::cli::{Args, Mode};
use moodlog::completion;
use moodlog::config::RuntimeConfig;
use moodlog::library::LibrarySource;
use moodlog::pipeline::{self, AnalyzeOptions};
use moodlog::playlists;
use moodlog::spotify::SpotifyClient;

/// Main entry point for Moodlog.
///
/// Initializes logging, parses command-line arguments, connects to Spotify
/// once and hands the fetched library to the selected mode.
///
/// # Error Handling
///
/// Uses `anyhow::Result` for rich error context. Configuration problems, a
/// failed token exchange and a library that cannot be fetched end the run.
/// Failures inside a year or bucket are logged and skipped by the modes
/// themselves.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=info moodlog --analyze` - Progress messages
/// - `RUST_LOG=moodlog::orchestrator=debug moodlog --analyze` - Per-request detail
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        return Ok(());
    }

    let config = RuntimeConfig::from_args(&args)?;

    let spotify = SpotifyClient::connect(&config.spotify, config.timeout)
        .context("Failed to refresh the Spotify access token")?;

    info!("Fetching saved tracks...");
    let entries = spotify
        .fetch_all_saved_entries()
        .context("Failed to fetch saved tracks")?;
    info!("Found {} saved tracks total", entries.len());

    match config.mode {
        Mode::Analyze => {
            let settings = config
                .classifier
                .clone()
                .context("Classifier settings are missing for analyze mode")?;
            let classifier = OpenAiClassifier::new(settings, config.timeout);
            let options = AnalyzeOptions {
                filter: config.filter,
                output_dir: config.output_dir.clone(),
                workers: config.workers,
            };

            let summary = pipeline::analyze(entries, &spotify, &classifier, &options)?;
            if summary.failed_buckets() > 0 {
                error!(
                    "{} bucket(s) could not be analyzed, see the log above",
                    summary.failed_buckets()
                );
            }
            println!("\nAnalysis complete. Reports saved to {}", config.output_dir.display());
        }
        Mode::ClearLikes => {
            info!("Clearing liked songs...");
            let removed = playlists::clear_likes(&entries, &spotify).context("Failed to clear liked songs")?;
            println!("Liked songs cleared ({removed} tracks)");
        }
        Mode::Organize => {
            let summary = playlists::organize(entries, &spotify, &config.filter);
            if summary.failed.is_empty() {
                println!("\nAll specified playlists created successfully!");
            } else {
                println!(
                    "\nCreated {} playlist(s); failed years: {:?}",
                    summary.created.len(),
                    summary.failed
                );
            }
        }
    }

    Ok(())
}
