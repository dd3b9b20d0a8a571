//! Organize and clear modes.
//!
//! Organize mode copies the liked songs of each selected year into a private
//! playlist named `Liked Songs <year>`. Clear mode removes every liked song
//! from the library. Both work in batches sized to the service's request
//! limits, and report progress as they go.

use log::{error, info};

use crate::error::ServiceError;
use crate::grouping::group_by_year;
use crate::library::{LibraryEditor, PLAYLIST_BATCH_SIZE, REMOVE_BATCH_SIZE};
use crate::range_filter::{filter_years, YearFilter};
use crate::track::LibraryEntry;

/// Result of organize mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrganizeSummary {
    /// `(year, playlist id)` of every playlist completed.
    pub created: Vec<(i32, String)>,
    /// Years that failed and were skipped.
    pub failed: Vec<i32>,
}

#[must_use]
pub fn playlist_name(year: i32) -> String {
    format!("Liked Songs {year}")
}

#[must_use]
pub fn playlist_description(year: i32) -> String {
    format!("Liked songs from {year}")
}

/// Creates one playlist per selected year from the liked songs.
///
/// A year that fails is logged and skipped; the remaining years are still
/// processed.
pub fn organize(entries: Vec<LibraryEntry>, editor: &dyn LibraryEditor, filter: &YearFilter) -> OrganizeSummary {
    let years = filter_years(group_by_year(entries), filter);

    println!("\nYear Summary:");
    for (year, tracks) in &years {
        println!("{year}: {} tracks", tracks.len());
    }

    let mut summary = OrganizeSummary::default();
    for (year, tracks) in &years {
        info!("Creating playlist for {year} with {} tracks", tracks.len());
        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();

        match build_playlist(editor, *year, &uris) {
            Ok(playlist_id) => {
                info!("Completed playlist: {}", playlist_name(*year));
                summary.created.push((*year, playlist_id));
            }
            Err(e) => {
                error!("Error processing year {year}: {e}. Skipping to next year...");
                summary.failed.push(*year);
            }
        }
    }

    summary
}

fn build_playlist(editor: &dyn LibraryEditor, year: i32, uris: &[String]) -> Result<String, ServiceError> {
    let playlist_id = editor.create_playlist(&playlist_name(year), &playlist_description(year))?;

    let mut added = 0;
    for chunk in uris.chunks(PLAYLIST_BATCH_SIZE) {
        editor.add_to_playlist(&playlist_id, chunk)?;
        added += chunk.len();
        info!("Added {added}/{} tracks to playlist", uris.len());
    }

    Ok(playlist_id)
}

/// Removes every entry from the saved library.
///
/// # Errors
///
/// Stops at the first batch the service rejects. Batches before it stay
/// removed.
pub fn clear_likes(entries: &[LibraryEntry], editor: &dyn LibraryEditor) -> Result<usize, ServiceError> {
    let ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();

    let mut removed = 0;
    for chunk in ids.chunks(REMOVE_BATCH_SIZE) {
        editor.remove_saved(chunk)?;
        removed += chunk.len();
        info!("Removed {removed}/{} tracks", ids.len());
    }

    Ok(removed)
}
