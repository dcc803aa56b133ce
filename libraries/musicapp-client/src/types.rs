//! Types for MusicApp API requests and responses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to a MusicApp backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    pub url: String,
    /// Access token restored from a previous session
    pub access_token: Option<String>,
    /// Refresh token restored from a previous session
    pub refresh_token: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
            refresh_token: None,
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Create a config with existing tokens.
    pub fn with_tokens(
        url: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token,
            ..Self::new(url)
        }
    }

    /// Override the request timeouts.
    pub fn timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the token and registration endpoints.
#[derive(Debug, Serialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Token pair returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Request body for token refresh.
#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response from token refresh.
///
/// `refresh` is only present when the backend rotates refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Account created by the registration endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisteredUser {
    pub username: String,
}

// =============================================================================
// Listing Types
// =============================================================================

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Listing body as sent by the backend: paginated endpoints wrap results,
/// the others return a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Paginated(Page<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_page(self) -> Page<T> {
        match self {
            Listing::Paginated(page) => page,
            Listing::Plain(results) => Page {
                count: results.len() as u64,
                next: None,
                previous: None,
                results,
            },
        }
    }
}

/// Filters for track listings.
#[derive(Debug, Clone, Default)]
pub struct TrackQuery {
    /// Free-text search over title, artist and album
    pub search: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size (server caps it at 50)
    pub page_size: Option<u32>,
}

impl TrackQuery {
    /// Query matching a search term.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size".to_string(), page_size.to_string()));
        }
        pairs
    }
}

// =============================================================================
// Library Types
// =============================================================================

/// An uploaded track.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: i64,
    pub title: Option<String>,
    pub file: Option<String>,
    /// Duration as formatted by the backend ("HH:MM:SS")
    pub duration: Option<String>,
    pub artist: Option<i64>,
    pub album: Option<i64>,
    pub uploaded_by: Option<i64>,
    #[serde(default)]
    pub genres: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<i64>,
    pub audio_file: Option<String>,
}

impl Track {
    /// Title for display, falling back to the stored file name.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.file.as_deref())
            .unwrap_or("Untitled")
    }
}

/// Partial update for an uploaded track.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrackUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A web track saved into the user's library.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OnlineTrack {
    pub id: i64,
    pub title: Option<String>,
    pub artist: Option<i64>,
    pub album: Option<i64>,
    pub stream_url: Option<String>,
    pub thumbnail: Option<String>,
    pub source: Option<String>,
}

/// Request body for saving a web track.
#[derive(Debug, Clone, Serialize)]
pub struct NewOnlineTrack {
    pub title: String,
    pub stream_url: String,
    pub thumbnail: Option<String>,
    pub source: String,
    pub artist: Option<i64>,
    pub album: Option<i64>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
}

impl From<&SearchResult> for NewOnlineTrack {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.title.clone(),
            stream_url: result.stream_url.clone().unwrap_or_default(),
            thumbnail: result.thumbnail.clone(),
            source: result.source.clone(),
            artist: None,
            album: None,
            genres: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// Artist record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub bio: String,
}

/// Album record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: i64,
    pub release_date: Option<NaiveDate>,
}

/// Metadata sent with a track upload.
#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    pub title: String,
    pub artist: Option<i64>,
    pub album: Option<i64>,
}

// =============================================================================
// Playlist Types
// =============================================================================

/// A user playlist.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for creating a playlist.
#[derive(Debug, Clone, Serialize)]
pub struct NewPlaylist {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Membership of a track in a playlist.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistItem {
    pub id: i64,
    pub playlist: i64,
    pub track: i64,
    pub added_at: Option<DateTime<Utc>>,
}

/// A favorited track.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Favorite {
    pub id: i64,
    pub track: i64,
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Search Types
// =============================================================================

/// A single hit from the aggregated web search.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchResult {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    pub stream_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub source: String,
}

/// Response from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}
