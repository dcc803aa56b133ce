//! Track upload.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::request::{ApiRequest, FilePart, MultipartBody};
use crate::types::{Track, UploadMetadata};
use std::path::Path;
use tracing::{debug, info};

/// Upload client for the MusicApp backend.
pub struct UploadClient<'a> {
    auth: &'a AuthClient,
}

impl<'a> UploadClient<'a> {
    pub(crate) fn new(auth: &'a AuthClient) -> Self {
        Self { auth }
    }

    /// Upload a single audio file as a new track.
    ///
    /// The file is buffered in memory so the request can be re-sent after a
    /// token refresh.
    pub async fn upload_track(&self, file_path: &Path, metadata: &UploadMetadata) -> Result<Track> {
        if metadata.title.trim().is_empty() {
            return Err(ClientError::InvalidInput("Track title is required".to_string()));
        }
        if !file_path.exists() {
            return Err(ClientError::FileNotFound(file_path.display().to_string()));
        }

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("track")
            .to_string();

        debug!(file = %file_path.display(), "Uploading track");

        let contents = tokio::fs::read(file_path).await?;
        let file_size = contents.len();

        let mut form = MultipartBody::default()
            .text("title", metadata.title.clone())
            .file(FilePart {
                field: "audio_file".to_string(),
                file_name: file_name.clone(),
                mime: mime_type_for_file(file_path).to_string(),
                contents,
            });

        if let Some(artist) = metadata.artist {
            form = form.text("artist", artist.to_string());
        }
        if let Some(album) = metadata.album {
            form = form.text("album", album.to_string());
        }

        let request = ApiRequest::post("/api/tracks/").multipart(form);
        let track: Track = self.auth.send_json(request).await?;

        info!(
            track_id = track.id,
            file = %file_name,
            size = file_size,
            "Track uploaded"
        );

        Ok(track)
    }
}

/// Get MIME type for an audio file based on extension.
fn mime_type_for_file(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("wav") => "audio/wav",
        Some("m4a" | "aac") => "audio/mp4",
        _ => "application/octet-stream",
    }
}
