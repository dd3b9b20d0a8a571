//! Collaborator traits for the remote music library.
//!
//! The pipeline only ever talks to the library through these traits, so tests
//! can drive it with in-memory fakes and the real client is constructed once
//! per run in `main`.

use crate::error::ServiceError;
use crate::track::{LibraryEntry, TrackMetadata};

/// Read access to the user's library.
///
/// `Sync` because popularity lookups for a bucket are issued from a worker
/// pool.
pub trait LibrarySource: Send + Sync {
    /// Every saved track, oldest page first as the service returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if any page cannot be fetched or decoded.
    fn fetch_all_saved_entries(&self) -> Result<Vec<LibraryEntry>, ServiceError>;

    /// Metadata for a single track, popularity included.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_track_metadata(&self, id: &str) -> Result<TrackMetadata, ServiceError>;
}

/// Page size used when listing saved tracks.
pub const SAVED_PAGE_SIZE: usize = 50;

/// Largest number of URIs accepted by one [`LibraryEditor::add_to_playlist`] call.
pub const PLAYLIST_BATCH_SIZE: usize = 100;

/// Largest number of ids accepted by one [`LibraryEditor::remove_saved`] call.
pub const REMOVE_BATCH_SIZE: usize = 50;

/// Write access to the user's library.
///
/// Each call handles one batch; callers split larger inputs into batches of
/// at most [`PLAYLIST_BATCH_SIZE`] URIs or [`REMOVE_BATCH_SIZE`] ids.
pub trait LibraryEditor {
    /// Creates a private playlist and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the request.
    fn create_playlist(&self, name: &str, description: &str) -> Result<String, ServiceError>;

    /// Appends one batch of track URIs to a playlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the request.
    fn add_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError>;

    /// Removes one batch of tracks from the saved library.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the request.
    fn remove_saved(&self, ids: &[String]) -> Result<(), ServiceError>;
}
