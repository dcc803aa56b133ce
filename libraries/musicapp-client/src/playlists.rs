//! Playlists and favorites.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::types::{Favorite, Listing, NewPlaylist, Playlist, PlaylistItem};
use serde_json::json;
use tracing::{debug, info};

/// Playlist client for the MusicApp backend.
pub struct PlaylistClient<'a> {
    auth: &'a AuthClient,
}

impl<'a> PlaylistClient<'a> {
    pub(crate) fn new(auth: &'a AuthClient) -> Self {
        Self { auth }
    }

    /// List the user's playlists.
    pub async fn list(&self) -> Result<Vec<Playlist>> {
        let listing: Listing<Playlist> =
            self.auth.send_json(ApiRequest::get("/api/playlists/")).await?;
        let playlists = listing.into_page().results;

        debug!(count = playlists.len(), "Fetched playlists");
        Ok(playlists)
    }

    /// Create a playlist.
    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::InvalidInput(
                "Playlist name is required".to_string(),
            ));
        }

        let request = ApiRequest::post("/api/playlists/").json(&NewPlaylist {
            name: name.to_string(),
            description: description.map(str::to_string),
        })?;
        let playlist: Playlist = self.auth.send_json(request).await?;

        info!(playlist_id = playlist.id, name = %playlist.name, "Playlist created");
        Ok(playlist)
    }

    /// Items of one playlist.
    pub async fn items(&self, playlist_id: i64) -> Result<Vec<PlaylistItem>> {
        let request =
            ApiRequest::get("/api/playlist-items/").query("playlist", playlist_id.to_string());
        let listing: Listing<PlaylistItem> = self.auth.send_json(request).await?;
        Ok(listing.into_page().results)
    }

    /// Add a track to a playlist.
    pub async fn add_item(&self, playlist_id: i64, track_id: i64) -> Result<PlaylistItem> {
        let request = ApiRequest::post("/api/playlist-items/").json(&json!({
            "playlist": playlist_id,
            "track": track_id,
        }))?;
        let item: PlaylistItem = self.auth.send_json(request).await?;

        info!(playlist_id, track_id, "Track added to playlist");
        Ok(item)
    }

    /// Remove a playlist item.
    pub async fn remove_item(&self, item_id: i64) -> Result<()> {
        self.auth
            .send_empty(ApiRequest::delete(format!("/api/playlist-items/{}/", item_id)))
            .await
    }

    /// List favorited tracks.
    pub async fn favorites(&self) -> Result<Vec<Favorite>> {
        let listing: Listing<Favorite> =
            self.auth.send_json(ApiRequest::get("/api/favorites/")).await?;
        Ok(listing.into_page().results)
    }

    /// Mark a track as favorite.
    pub async fn add_favorite(&self, track_id: i64) -> Result<Favorite> {
        let request = ApiRequest::post("/api/favorites/").json(&json!({ "track": track_id }))?;
        self.auth.send_json(request).await
    }

    /// Remove a favorite.
    pub async fn remove_favorite(&self, favorite_id: i64) -> Result<()> {
        self.auth
            .send_empty(ApiRequest::delete(format!("/api/favorites/{}/", favorite_id)))
            .await
    }
}
