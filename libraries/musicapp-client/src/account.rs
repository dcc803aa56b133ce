//! Login, registration and logout.

use crate::auth::AuthClient;
use crate::credentials::Credential;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::types::{RegisteredUser, TokenPair, TokenRequest};
use tracing::{debug, info, warn};

/// Minimum password length accepted by registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Account client for the MusicApp backend.
pub struct AccountClient<'a> {
    auth: &'a AuthClient,
}

impl<'a> AccountClient<'a> {
    pub(crate) fn new(auth: &'a AuthClient) -> Self {
        Self { auth }
    }

    /// Login with username and password.
    ///
    /// On success both tokens are stored, replacing any previous session.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        debug!(username = %username, "Attempting login");

        let request = ApiRequest::post("/api/auth/token/").json(&TokenRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        let response = match self.auth.send_public(request).await {
            Ok(response) => response,
            Err(ClientError::Validation { status: 400, body } | ClientError::AuthFailed(body)) => {
                warn!(error = %body, "Login failed: invalid credentials");
                return Err(ClientError::AuthFailed(
                    "Invalid username or password".to_string(),
                ));
            }
            Err(e) => return Err(e),
        };

        let tokens: TokenPair = AuthClient::decode(response, "/api/auth/token/").await?;

        self.auth
            .credentials()
            .store(Credential {
                access: tokens.access.clone(),
                refresh: Some(tokens.refresh.clone()),
            })
            .await;

        info!(username = %username, "Login successful");
        Ok(tokens)
    }

    /// Create a new account. Does not log in.
    pub async fn register(&self, username: &str, password: &str) -> Result<RegisteredUser> {
        if username.trim().is_empty() {
            return Err(ClientError::InvalidInput("Username is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let request = ApiRequest::post("/api/register/").json(&TokenRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        let response = self.auth.send_public(request).await?;
        let user: RegisteredUser = AuthClient::decode(response, "/api/register/").await?;

        info!(username = %user.username, "Account registered");
        Ok(user)
    }

    /// Discard the stored tokens.
    pub async fn logout(&self) {
        self.auth.credentials().clear().await;
        info!("Logged out");
    }
}
