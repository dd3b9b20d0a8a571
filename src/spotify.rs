//! Spotify Web API client.
//!
//! Implements [`LibrarySource`] and [`LibraryEditor`] over blocking HTTP. The
//! client is built once per run: [`SpotifyClient::connect`] exchanges the
//! refresh token for an access token, which is then used for every request
//! of the run. Tokens are never renewed.
//!
//! Endpoints used:
//! - `POST accounts.spotify.com/api/token` (refresh-token grant)
//! - `GET  /v1/me/tracks` (saved tracks, paginated)
//! - `GET  /v1/tracks/{id}` (popularity)
//! - `POST /v1/me/playlists`, `POST /v1/playlists/{id}/tracks`
//! - `DELETE /v1/me/tracks`

use base64::Engine;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::SpotifyCredentials;
use crate::error::ServiceError;
use crate::library::{LibraryEditor, LibrarySource, SAVED_PAGE_SIZE};
use crate::track::{LibraryEntry, TrackMetadata};

const SERVICE: &str = "Spotify";
const ACCOUNTS_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = concat!("moodlog/", env!("CARGO_PKG_VERSION"));

// ── API response types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SavedTracksPage {
    items: Vec<SavedTrackItem>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SavedTrackItem {
    added_at: DateTime<Utc>,
    track: Option<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    /// `None` for local files.
    id: Option<String>,
    uri: String,
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtist>,
    #[serde(default)]
    popularity: u8,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiPlaylist {
    id: String,
}

impl SavedTrackItem {
    /// Converts to a library entry; items without a playable track id are
    /// dropped.
    fn into_entry(self) -> Option<LibraryEntry> {
        let track = self.track?;
        let id = track.id?;
        Some(LibraryEntry {
            uri: track.uri,
            id,
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            date_liked: self.added_at,
        })
    }
}

impl From<ApiTrack> for TrackMetadata {
    fn from(track: ApiTrack) -> Self {
        TrackMetadata {
            id: track.id.unwrap_or_default(),
            name: track.name,
            popularity: track.popularity.min(100),
            artists: track.artists.into_iter().map(|a| a.name).collect(),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Authenticated Spotify client for one run.
pub struct SpotifyClient {
    agent: ureq::Agent,
    api_base: String,
    access_token: String,
}

impl SpotifyClient {
    /// Exchanges the refresh token for an access token and returns a ready
    /// client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint rejects the credentials or is
    /// unreachable.
    pub fn connect(credentials: &SpotifyCredentials, timeout: Duration) -> Result<Self, ServiceError> {
        let agent = build_agent(timeout);
        let basic = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            credentials.client_id, credentials.client_secret
        ));

        debug!("Exchanging refresh token for an access token");
        let response = agent
            .post(ACCOUNTS_URL)
            .set("Authorization", &format!("Basic {basic}"))
            .send_form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .map_err(|e| ServiceError::from_ureq(SERVICE, e))?;

        let token: TokenResponse = response
            .into_json()
            .map_err(|e| ServiceError::decode(SERVICE, e.to_string()))?;
        info!("Obtained Spotify access token");

        Ok(Self {
            agent,
            api_base: API_BASE.to_string(),
            access_token: token.access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    fn fetch_saved_page(&self, offset: usize) -> Result<SavedTracksPage, ServiceError> {
        self.agent
            .get(&self.url("/me/tracks"))
            .set("Authorization", &self.bearer())
            .query("limit", &SAVED_PAGE_SIZE.to_string())
            .query("offset", &offset.to_string())
            .call()
            .map_err(|e| ServiceError::from_ureq(SERVICE, e))?
            .into_json()
            .map_err(|e| ServiceError::decode(SERVICE, e.to_string()))
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

impl LibrarySource for SpotifyClient {
    fn fetch_all_saved_entries(&self) -> Result<Vec<LibraryEntry>, ServiceError> {
        let mut entries = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.fetch_saved_page(offset)?;
            if page.items.is_empty() {
                break;
            }

            let has_next = page.next.is_some();
            offset += page.items.len();
            for item in page.items {
                let added_at = item.added_at;
                match item.into_entry() {
                    Some(entry) => entries.push(entry),
                    None => warn!("Skipping saved item from {added_at} without a track id (local file?)"),
                }
            }
            info!("Fetched {} tracks so far...", entries.len());

            if !has_next {
                break;
            }
        }

        Ok(entries)
    }

    fn fetch_track_metadata(&self, id: &str) -> Result<TrackMetadata, ServiceError> {
        debug!("Looking up track {id}");
        let track: ApiTrack = self
            .agent
            .get(&self.url(&format!("/tracks/{id}")))
            .set("Authorization", &self.bearer())
            .call()
            .map_err(|e| ServiceError::from_ureq(SERVICE, e))?
            .into_json()
            .map_err(|e| ServiceError::decode(SERVICE, e.to_string()))?;
        Ok(track.into())
    }
}

impl LibraryEditor for SpotifyClient {
    fn create_playlist(&self, name: &str, description: &str) -> Result<String, ServiceError> {
        let playlist: ApiPlaylist = self
            .agent
            .post(&self.url("/me/playlists"))
            .set("Authorization", &self.bearer())
            .send_json(json!({
                "name": name,
                "description": description,
                "public": false,
            }))
            .map_err(|e| ServiceError::from_ureq(SERVICE, e))?
            .into_json()
            .map_err(|e| ServiceError::decode(SERVICE, e.to_string()))?;
        Ok(playlist.id)
    }

    fn add_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError> {
        self.agent
            .post(&self.url(&format!("/playlists/{playlist_id}/tracks")))
            .set("Authorization", &self.bearer())
            .send_json(json!({ "uris": uris }))
            .map_err(|e| ServiceError::from_ureq(SERVICE, e))?;
        Ok(())
    }

    fn remove_saved(&self, ids: &[String]) -> Result<(), ServiceError> {
        self.agent
            .delete(&self.url("/me/tracks"))
            .set("Authorization", &self.bearer())
            .send_json(json!({ "ids": ids }))
            .map_err(|e| ServiceError::from_ureq(SERVICE, e))?;
        Ok(())
    }
}
