//! # Command-Line Interface Module
//!
//! Defines the command-line interface for Moodlog using Clap derive macros.
//! Moodlog is driven by flags rather than subcommands. Three modes exist, and
//! when several mode flags are given the first match wins:
//!
//! 1. `--analyze`: classify and summarize liked songs per year and month
//! 2. `--clear-likes`: remove every saved track from the library
//! 3. otherwise: organize liked songs into one playlist per year
//!
//! `--year`, `--start-year` and `--end-year` narrow the years processed by
//! analyze and organize mode.
//!
//! ## Examples
//!
//! ```bash
//! moodlog                                  # playlists for every year
//! moodlog --start-year 2020 --end-year 2022
//! moodlog --analyze --year 2023
//! moodlog --completions fish > ~/.config/fish/completions/moodlog.fish
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL, DEFAULT_OUTPUT_DIR};
use crate::range_filter::YearFilter;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// What a run does, resolved from the mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Analyze,
    ClearLikes,
    Organize,
}

/// Main application arguments structure.
///
/// Credentials are read from the environment when the flags are absent, so
/// a typical invocation only carries mode and year flags.
#[derive(Parser, Debug)]
#[command(name = "moodlog")]
#[command(about = "Moodlog: year-by-year mood reports and playlists for your liked songs")]
#[command(version)]
pub struct Args {
    /// Classify liked songs and write a mood report per year
    ///
    /// Each month (and each year as a whole) is sent to the classifier as one
    /// batch. Reports are written to the output directory as
    /// `analysis_<year>.json` and summarized on stdout.
    #[arg(long)]
    pub analyze: bool,

    /// Only clear liked songs without creating playlists
    #[arg(long)]
    pub clear_likes: bool,

    /// Process only songs from a specific year
    #[arg(long)]
    pub year: Option<i32>,

    /// Start processing from this year
    #[arg(long)]
    pub start_year: Option<i32>,

    /// End processing at this year
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Directory for analysis reports (created if missing)
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, value_hint = clap::ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// Parallel popularity lookups per month
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Timeout in seconds for each HTTP request
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    /// Classifier model
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Root of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// API key for the classifier (analyze mode only)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Spotify application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,

    /// Refresh token minted for your account
    #[arg(long, env = "SPOTIFY_REFRESH_TOKEN", hide_env_values = true)]
    pub spotify_refresh_token: Option<String>,

    /// Print a completion script for the given shell and exit
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

impl Args {
    /// Resolves the mode flags: analyze, then clear, else organize.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.analyze {
            Mode::Analyze
        } else if self.clear_likes {
            Mode::ClearLikes
        } else {
            Mode::Organize
        }
    }

    #[must_use]
    pub fn year_filter(&self) -> YearFilter {
        YearFilter {
            year: self.year,
            start_year: self.start_year,
            end_year: self.end_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_mode_precedence() {
        let both = Args::try_parse_from(["moodlog", "--clear-likes", "--analyze"]).unwrap();
        assert_eq!(both.mode(), Mode::Analyze);

        let clear = Args::try_parse_from(["moodlog", "--clear-likes"]).unwrap();
        assert_eq!(clear.mode(), Mode::ClearLikes);

        let none = Args::try_parse_from(["moodlog"]).unwrap();
        assert_eq!(none.mode(), Mode::Organize);
    }

    #[test]
    fn test_year_flags_are_not_exclusive() {
        let args = Args::try_parse_from([
            "moodlog",
            "--year",
            "2021",
            "--start-year",
            "2019",
            "--end-year",
            "2022",
        ])
        .unwrap();

        let filter = args.year_filter();
        assert_eq!(filter.year, Some(2021));
        assert_eq!(filter.start_year, Some(2019));
        assert_eq!(filter.end_year, Some(2022));
    }

    #[test]
    fn test_completions_flag_parses_shell() {
        let args = Args::try_parse_from(["moodlog", "--completions", "zsh"]).unwrap();
        assert_eq!(args.completions, Some(Shell::Zsh));
    }
}
