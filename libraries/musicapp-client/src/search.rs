//! Aggregated web search.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::types::{SearchResponse, SearchResult};
use tracing::debug;
use url::Url;

/// How a search hit can be played back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Direct audio stream, playable by a native audio element
    Stream { url: String },
    /// YouTube video, played in an iframe driven by postMessage commands
    YouTube { video_id: String },
    /// Mixcloud cloudcast, played through the Mixcloud widget
    Mixcloud { feed: String },
}

impl MediaSource {
    /// URL to load in the player for this source.
    pub fn player_url(&self) -> String {
        match self {
            Self::Stream { url } => url.clone(),
            Self::YouTube { video_id } => {
                format!("https://www.youtube.com/embed/{}?enablejsapi=1", video_id)
            }
            Self::Mixcloud { feed } => format!(
                "https://www.mixcloud.com/widget/iframe/?hide_cover=1&mini=1&feed={}",
                feed
            ),
        }
    }

    pub fn is_embed(&self) -> bool {
        !matches!(self, Self::Stream { .. })
    }
}

impl SearchResult {
    /// Whether the hit comes from an embed-only provider.
    pub fn is_embed_source(&self) -> bool {
        matches!(self.source.as_str(), "youtube" | "mixcloud")
    }

    /// Whether the hit has a direct stream a native player can use.
    pub fn is_directly_playable(&self) -> bool {
        self.stream_url.is_some() && !self.is_embed_source()
    }

    /// Resolve how to play this hit. `None` if the URL is missing or malformed.
    pub fn media_source(&self) -> Option<MediaSource> {
        let stream_url = self.stream_url.as_deref()?;
        match self.source.as_str() {
            "youtube" => {
                let url = Url::parse(stream_url).ok()?;
                let video_id = url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?;
                Some(MediaSource::YouTube { video_id })
            }
            "mixcloud" => {
                let url = Url::parse(stream_url).ok()?;
                Some(MediaSource::Mixcloud {
                    feed: url.path().to_string(),
                })
            }
            _ => Some(MediaSource::Stream {
                url: stream_url.to_string(),
            }),
        }
    }
}

/// Order hits with direct streams first, embeds after; relative order is kept.
pub fn order_playable_first(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let (mut playable, embeddable): (Vec<_>, Vec<_>) = results
        .into_iter()
        .partition(SearchResult::is_directly_playable);
    playable.extend(embeddable);
    playable
}

/// Search client for the MusicApp backend.
pub struct SearchClient<'a> {
    auth: &'a AuthClient,
}

impl<'a> SearchClient<'a> {
    pub(crate) fn new(auth: &'a AuthClient) -> Self {
        Self { auth }
    }

    /// Search all web providers.
    ///
    /// Works anonymously; when logged in the token is attached and a 401 is
    /// recovered like any other call.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let request = ApiRequest::get("/api/search/").query("q", query);
        let body: SearchResponse = self.auth.send_json(request).await?;

        debug!(query = %query, results = body.results.len(), "Search completed");
        Ok(order_playable_first(body.results))
    }
}
