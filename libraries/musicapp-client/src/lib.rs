//! MusicApp Client
//!
//! HTTP client library for the MusicApp catalog backend.
//!
//! # Features
//!
//! - **Authentication**: Login/registration, bearer tokens on every call
//! - **Token recovery**: A 401 triggers one refresh-and-retry; concurrent
//!   401s share a single refresh exchange
//! - **Library**: Uploaded tracks, saved web tracks, artists, albums
//! - **Upload**: Multipart track upload that survives a token refresh
//! - **Playlists**: Playlists, playlist items, favorites
//! - **Search**: Aggregated web search, ordered playable-first
//!
//! # Example
//!
//! ```ignore
//! use musicapp_client::{ClientConfig, ClientError, MusicAppClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MusicAppClient::new(ClientConfig::new("http://localhost:8000"))?;
//!     client.login("user", "password").await?;
//!
//!     match client.playlists().list().await {
//!         Ok(playlists) => println!("{} playlists", playlists.len()),
//!         Err(ClientError::SessionExpired) => println!("Please log in again"),
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod account;
mod auth;
mod client;
mod credentials;
mod error;
mod library;
mod playlists;
mod request;
mod search;
mod types;
mod upload;

// Re-export main types
pub use client::MusicAppClient;
pub use credentials::{Credential, CredentialStore, SessionState};
pub use error::{ClientError, Result};
pub use request::{ApiRequest, FilePart, MultipartBody, RequestBody};
pub use search::{order_playable_first, MediaSource};
pub use types::{
    Album, Artist, ClientConfig, Favorite, NewOnlineTrack, NewPlaylist, OnlineTrack, Page,
    Playlist, PlaylistItem, RefreshResponse, RegisteredUser, SearchResult, TokenPair, Track,
    TrackQuery, TrackUpdate, UploadMetadata,
};

// Re-export sub-clients for direct use if needed
pub use account::{AccountClient, MIN_PASSWORD_LEN};
pub use auth::AuthClient;
pub use library::LibraryClient;
pub use playlists::PlaylistClient;
pub use search::SearchClient;
pub use upload::UploadClient;
