//! Authenticated request execution with token refresh recovery.

use crate::credentials::{CredentialStore, SessionState};
use crate::error::{ClientError, Result};
use crate::request::{ApiRequest, PendingRequest, RequestBody};
use crate::types::{RefreshRequest, RefreshResponse};
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Outcome of a refresh exchange, shared by every caller awaiting it.
type RefreshFuture = Shared<BoxFuture<'static, std::result::Result<String, String>>>;

/// Executes requests with the current bearer token.
///
/// A request rejected with 401 is recovered once: the access token is
/// refreshed and the request re-issued. Concurrent rejections share a
/// single refresh exchange. Clones share credentials and the refresh slot.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: Arc<str>,
    store: CredentialStore,
    inflight: Arc<Mutex<Option<RefreshFuture>>>,
}

impl AuthClient {
    pub(crate) fn new(http: Client, base_url: impl Into<Arc<str>>, store: CredentialStore) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            store,
            inflight: Arc::new(Mutex::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    /// Send a request with the current access token attached.
    ///
    /// Fails fast with `SessionExpired` once the session has ended.
    pub async fn send(&self, request: ApiRequest) -> Result<Response> {
        if self.store.state().await == SessionState::Expired {
            debug!(path = %request.path, "Session expired, not sending request");
            return Err(ClientError::SessionExpired);
        }

        let token = self.store.access_token().await;
        let response = self.execute(&request, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return self.recover(PendingRequest::new(request, token)).await;
        }

        Self::check(response).await
    }

    /// Send a request and decode its JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        Self::decode(response, &path).await
    }

    /// Send a request and discard the response body.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await.map(|_| ())
    }

    /// Send a request without credentials and without 401 recovery.
    ///
    /// Used for the token and registration endpoints.
    pub async fn send_public(&self, request: ApiRequest) -> Result<Response> {
        let response = self.execute(&request, None).await?;
        Self::check(response).await
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// At most one exchange is in flight: callers arriving while one is
    /// running await the same result. On failure the store is cleared and
    /// `SessionExpired` is returned.
    pub async fn refresh(&self) -> Result<String> {
        let exchange = {
            let mut slot = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(inflight) => {
                    debug!("Joining in-flight token refresh");
                    inflight.clone()
                }
                None => {
                    let exchange = self.exchange().boxed().shared();
                    *slot = Some(exchange.clone());
                    exchange
                }
            }
        };

        exchange.await.map_err(|_| ClientError::SessionExpired)
    }

    /// Build the refresh exchange. Store updates happen here, once, no
    /// matter how many callers await the shared result.
    fn exchange(&self) -> impl std::future::Future<Output = std::result::Result<String, String>> {
        let http = self.http.clone();
        let url = format!("{}/api/auth/token/refresh/", self.base_url);
        let store = self.store.clone();
        let slot = Arc::clone(&self.inflight);

        async move {
            debug!(url = %url, "Refreshing access token");
            let outcome = refresh_exchange(&http, &url, &store).await;
            let has_credential = store.credential().await.is_some();

            match &outcome {
                Ok(_) => info!("Access token refreshed"),
                // A logout during the exchange already cleared the store
                Err(reason) if !has_credential => {
                    debug!(reason = %reason, "Token refresh abandoned");
                }
                Err(reason) => {
                    warn!(reason = %reason, "Token refresh failed, ending session");
                    store.expire().await;
                }
            }

            slot.lock().unwrap_or_else(PoisonError::into_inner).take();
            outcome
        }
    }

    /// Recover a request rejected with 401.
    async fn recover(&self, mut pending: PendingRequest) -> Result<Response> {
        let path = pending.request.path.clone();

        if !pending.mark_retried() {
            return self.end_session(&path, "request already retried").await;
        }

        if self.store.state().await == SessionState::Expired {
            return Err(ClientError::SessionExpired);
        }

        let token = match self.store.access_token().await {
            Some(current) if pending.sent_with.as_deref() != Some(current.as_str()) => {
                debug!(path = %path, "Access token was replaced meanwhile, retrying");
                current
            }
            _ => {
                if self.store.refresh_token().await.is_none() {
                    return self.end_session(&path, "no refresh token held").await;
                }
                warn!(path = %path, "Access token rejected, refreshing");
                self.refresh().await?
            }
        };

        let response = self.execute(&pending.request, Some(&token)).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return self.end_session(&path, "retried request rejected").await;
        }

        Self::check(response).await
    }

    async fn end_session(&self, path: &str, reason: &str) -> Result<Response> {
        warn!(path = %path, reason = %reason, "Authorization failed, ending session");
        self.store.expire().await;
        Err(ClientError::SessionExpired)
    }

    async fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(
            method = %request.method,
            url = %url,
            authenticated = token.is_some(),
            "Sending request"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Multipart(body)) => builder.multipart(body.to_form()?),
            None => builder,
        };

        builder.send().await.map_err(ClientError::transport)
    }

    /// Map non-success statuses to errors.
    pub(crate) async fn check(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        // Only reached for a 401 on the public endpoints
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthFailed(if body.is_empty() {
                "Unauthorized".to_string()
            } else {
                body
            }));
        }
        if status.is_client_error() {
            Err(ClientError::Validation {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(ClientError::Server {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    pub(crate) async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
        response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse response from {}: {}", path, e))
        })
    }
}

async fn refresh_exchange(
    http: &Client,
    url: &str,
    store: &CredentialStore,
) -> std::result::Result<String, String> {
    let refresh = store
        .refresh_token()
        .await
        .ok_or_else(|| "no refresh token held".to_string())?;

    let response = http
        .post(url)
        .json(&RefreshRequest { refresh })
        .send()
        .await
        .map_err(|e| format!("refresh request failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("refresh rejected with status {}", status.as_u16()));
    }

    let body: RefreshResponse = response
        .json()
        .await
        .map_err(|e| format!("failed to parse refresh response: {}", e))?;

    if store.replace_access(body.access.clone(), body.refresh).await {
        Ok(body.access)
    } else {
        Err("session ended while refreshing".to_string())
    }
}
