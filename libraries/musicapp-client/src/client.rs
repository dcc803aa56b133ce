//! Main MusicApp client.

use crate::account::AccountClient;
use crate::auth::AuthClient;
use crate::credentials::{Credential, CredentialStore, SessionState};
use crate::error::{ClientError, Result};
use crate::library::LibraryClient;
use crate::playlists::PlaylistClient;
use crate::search::SearchClient;
use crate::types::{ClientConfig, RegisteredUser, TokenPair};
use crate::upload::UploadClient;
use reqwest::Client;
use tracing::info;

/// Main client for interacting with a MusicApp backend.
///
/// Owns the HTTP client and the credential store. Every resource call goes
/// through [`AuthClient`], which attaches the bearer token and recovers from
/// an expired access token.
///
/// # Example
///
/// ```ignore
/// use musicapp_client::{ClientConfig, MusicAppClient, TrackQuery};
///
/// let client = MusicAppClient::new(ClientConfig::new("http://localhost:8000"))?;
/// client.login("user", "password").await?;
///
/// let tracks = client.library().list_tracks(&TrackQuery::default()).await?;
/// println!("{} tracks", tracks.count);
/// ```
pub struct MusicAppClient {
    auth: AuthClient,
}

impl MusicAppClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("MusicApp/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Network)?;

        let credential = config.access_token.map(|access| Credential {
            access,
            refresh: config.refresh_token,
        });

        Ok(Self {
            auth: AuthClient::new(http, url, CredentialStore::with_credential(credential)),
        })
    }

    /// Get the backend URL.
    pub fn url(&self) -> &str {
        self.auth.base_url()
    }

    /// Request executor shared by the resource clients.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.auth.credentials()
    }

    /// Check if the client holds a live session.
    pub async fn is_authenticated(&self) -> bool {
        self.credentials().is_authenticated().await
    }

    pub async fn session_state(&self) -> SessionState {
        self.credentials().state().await
    }

    /// Login with username and password; tokens are stored on success.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        self.account().login(username, password).await
    }

    /// Register a new account.
    pub async fn register(&self, username: &str, password: &str) -> Result<RegisteredUser> {
        self.account().register(username, password).await
    }

    /// Clear stored tokens (logout).
    pub async fn logout(&self) {
        self.account().logout().await;
    }

    /// Set tokens directly (e.g., from a persisted session).
    pub async fn set_tokens(&self, access_token: String, refresh_token: Option<String>) {
        self.credentials()
            .store(Credential {
                access: access_token,
                refresh: refresh_token,
            })
            .await;
        info!("Session restored");
    }

    /// Get the current tokens.
    pub async fn get_tokens(&self) -> (Option<String>, Option<String>) {
        match self.credentials().credential().await {
            Some(credential) => (Some(credential.access), credential.refresh),
            None => (None, None),
        }
    }

    pub fn account(&self) -> AccountClient<'_> {
        AccountClient::new(&self.auth)
    }

    pub fn library(&self) -> LibraryClient<'_> {
        LibraryClient::new(&self.auth)
    }

    pub fn uploads(&self) -> UploadClient<'_> {
        UploadClient::new(&self.auth)
    }

    pub fn playlists(&self) -> PlaylistClient<'_> {
        PlaylistClient::new(&self.auth)
    }

    pub fn search(&self) -> SearchClient<'_> {
        SearchClient::new(&self.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(MusicAppClient::new(ClientConfig::new("https://example.com")).is_ok());
        assert!(MusicAppClient::new(ClientConfig::new("http://localhost:8000")).is_ok());

        assert!(MusicAppClient::new(ClientConfig::new("")).is_err());
        assert!(MusicAppClient::new(ClientConfig::new("not-a-url")).is_err());
        assert!(MusicAppClient::new(ClientConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client =
            MusicAppClient::new(ClientConfig::new("http://localhost:8000/")).expect("valid url");
        assert_eq!(client.url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn restored_tokens_start_authenticated() {
        let client = MusicAppClient::new(ClientConfig::with_tokens(
            "http://localhost:8000",
            "access",
            Some("refresh".to_string()),
        ))
        .unwrap();

        assert!(client.is_authenticated().await);
        assert_eq!(
            client.get_tokens().await,
            (Some("access".to_string()), Some("refresh".to_string()))
        );
    }
}
