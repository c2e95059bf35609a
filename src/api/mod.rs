//! HTTP chokepoint for the UCMS API.
//!
//! Every call goes through [`ApiClient::request`], which attaches the stored
//! bearer token and handles a single transparent token refresh on 401.

use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorResponse};
use crate::models::{AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, UserProfile};
use crate::session::{Session, SessionStore};
use crate::validation;

pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    store: Arc<dyn SessionStore>,
    /// Held across a token refresh so concurrent 401s share one exchange.
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            http,
            config,
            store,
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session, ClientError> {
        validation::validate_login(credentials)?;

        let body = serde_json::to_value(credentials)?;
        let response = self.send(Method::POST, "/auth/login", Some(&body), None).await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(ErrorResponse::into_message)
                .unwrap_or_else(|| "Invalid username or password".to_string());
            return Err(ClientError::Auth(message));
        }
        if !status.is_success() {
            return Err(ClientError::api(status, &text));
        }

        let auth: AuthResponse = serde_json::from_str(&text)?;
        let session = Session {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            user: auth.user,
        };
        self.store.save(&session).await?;
        info!(
            "logged in as {} ({})",
            session.user.username, session.user.role
        );
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.store.clear().await?;
        info!("logged out");
        Ok(())
    }

    pub async fn session(&self) -> Option<Session> {
        match self.store.load().await {
            Ok(session) => session,
            Err(e) => {
                warn!("failed to read stored session: {}", e);
                None
            }
        }
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.session().await.map(|s| s.user)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session()
            .await
            .is_some_and(|s| !s.access_token.is_empty())
    }

    /// Sends an authorized request and decodes the JSON answer.
    ///
    /// On a 401 the stored refresh token is exchanged once and the call is
    /// replayed once. If the refresh fails, or the replay is rejected again,
    /// the session is cleared and [`ClientError::SessionExpired`] returned.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let mut retried = false;

        loop {
            let token = self.session().await.map(|s| s.access_token);
            let response = self
                .send(method.clone(), path, body.as_ref(), token.as_deref())
                .await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if retried {
                    warn!("{} {} still unauthorized after refresh", method, path);
                    self.expire_session().await;
                    return Err(ClientError::SessionExpired);
                }
                retried = true;
                self.refresh_session(token.as_deref()).await?;
                continue;
            }

            let text = response.text().await?;
            if !status.is_success() {
                debug!("{} {} failed with {}", method, path, status);
                return Err(ClientError::api(status, &text));
            }
            return decode(&text);
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::POST, path, None).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::DELETE, path, None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        debug!("{} {}", method, path);
        let mut builder = self.http.request(method, self.config.url(path));
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// `rejected` is the access token that drew the 401. When another call
    /// has already replaced it by the time the gate is acquired, the caller
    /// just replays with the stored token.
    async fn refresh_session(&self, rejected: Option<&str>) -> Result<(), ClientError> {
        let _gate = self.refresh_gate.lock().await;

        let session = match self.session().await {
            Some(session) => session,
            None => {
                self.expire_session().await;
                return Err(ClientError::SessionExpired);
            }
        };
        if !session.access_token.is_empty() && Some(session.access_token.as_str()) != rejected {
            debug!("access token already refreshed by a concurrent call");
            return Ok(());
        }
        if session.refresh_token.is_empty() {
            self.expire_session().await;
            return Err(ClientError::SessionExpired);
        }

        let refreshed = match self.exchange_refresh_token(session.refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                warn!("token refresh failed: {}", e);
                self.expire_session().await;
                return Err(ClientError::SessionExpired);
            }
        };
        if let Err(e) = self
            .store
            .set_tokens(&refreshed.access_token, refreshed.refresh_token.as_deref())
            .await
        {
            warn!("failed to store refreshed tokens: {}", e);
            self.expire_session().await;
            return Err(ClientError::SessionExpired);
        }
        info!("access token refreshed");
        Ok(())
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: String,
    ) -> Result<RefreshResponse, ClientError> {
        let body = serde_json::to_value(RefreshRequest { refresh_token })?;
        let response = self
            .send(Method::POST, "/auth/refresh", Some(&body), None)
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::api(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn expire_session(&self) {
        if let Err(e) = self.store.clear().await {
            warn!("failed to clear expired session: {}", e);
        }
    }
}

/// Empty bodies decode as `null`, so callers can ask for `()`.
fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ClientError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    Ok(serde_json::from_str(text)?)
}
