//! Library operations: uploaded tracks, saved web tracks, artists, albums.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::types::{
    Album, Artist, Listing, NewOnlineTrack, OnlineTrack, Page, Track, TrackQuery, TrackUpdate,
};
use tracing::{debug, info};

/// Library client for the MusicApp backend.
pub struct LibraryClient<'a> {
    auth: &'a AuthClient,
}

impl<'a> LibraryClient<'a> {
    pub(crate) fn new(auth: &'a AuthClient) -> Self {
        Self { auth }
    }

    /// List uploaded tracks.
    pub async fn list_tracks(&self, query: &TrackQuery) -> Result<Page<Track>> {
        let request = ApiRequest::get("/api/tracks/").query_pairs(query.to_pairs());
        let listing: Listing<Track> = self.auth.send_json(request).await?;
        let page = listing.into_page();

        debug!(count = page.count, returned = page.results.len(), "Fetched tracks");
        Ok(page)
    }

    /// Update fields of an uploaded track.
    pub async fn update_track(&self, id: i64, update: &TrackUpdate) -> Result<Track> {
        let request = ApiRequest::patch(format!("/api/tracks/{}/", id)).json(update)?;
        let track: Track = self.auth.send_json(request).await?;

        info!(track_id = id, "Track updated");
        Ok(track)
    }

    /// Delete an uploaded track.
    pub async fn delete_track(&self, id: i64) -> Result<()> {
        self.auth
            .send_empty(ApiRequest::delete(format!("/api/tracks/{}/", id)))
            .await?;

        info!(track_id = id, "Track deleted");
        Ok(())
    }

    /// List web tracks saved to the library.
    pub async fn list_online_tracks(&self, query: &TrackQuery) -> Result<Page<OnlineTrack>> {
        let request = ApiRequest::get("/api/online-tracks/").query_pairs(query.to_pairs());
        let listing: Listing<OnlineTrack> = self.auth.send_json(request).await?;
        let page = listing.into_page();

        debug!(count = page.count, "Fetched online tracks");
        Ok(page)
    }

    /// Save a web track to the library.
    ///
    /// Returns `Duplicate` when the backend reports the track already exists.
    pub async fn add_online_track(&self, track: &NewOnlineTrack) -> Result<OnlineTrack> {
        if track.stream_url.is_empty() {
            return Err(ClientError::InvalidInput(
                "A stream URL is required to save a track".to_string(),
            ));
        }

        let request = ApiRequest::post("/api/online-tracks/").json(track)?;

        match self.auth.send_json::<OnlineTrack>(request).await {
            Ok(saved) => {
                info!(track_id = saved.id, source = %track.source, "Online track saved");
                Ok(saved)
            }
            Err(ClientError::Validation { status: 400, body }) if body.contains("already exists") => {
                Err(ClientError::Duplicate(track.title.clone()))
            }
            Err(e) => Err(e),
        }
    }

    /// List all artists.
    pub async fn artists(&self) -> Result<Vec<Artist>> {
        let listing: Listing<Artist> = self.auth.send_json(ApiRequest::get("/api/artists/")).await?;
        Ok(listing.into_page().results)
    }

    /// List all albums.
    pub async fn albums(&self) -> Result<Vec<Album>> {
        let listing: Listing<Album> = self.auth.send_json(ApiRequest::get("/api/albums/")).await?;
        Ok(listing.into_page().results)
    }
}
