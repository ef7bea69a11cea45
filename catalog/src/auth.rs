//! Credentials for the remote skills service.
//!
//! Tokens are cached per provider instance; there is no process-wide token.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{header, Client, Url};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Tokens are refreshed this long before the server says they expire.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// A token issued out of band.
pub struct StaticToken(pub String);

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    refresh_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// OAuth2 client-credentials grant with an in-memory token cache.
pub struct ClientCredentials {
    client: Client,
    token_url: Url,
    client_id: String,
    client_secret: String,
    scope: String,
    cache: RwLock<Option<CachedToken>>,
}

impl ClientCredentials {
    pub fn new(client: Client, token_url: Url, client_id: String, client_secret: String, scope: String) -> Self {
        Self { client, token_url, client_id, client_secret, scope, cache: RwLock::new(None) }
    }

    fn cached(&self, now: Instant) -> Option<String> {
        let c = self.cache.read();
        c.as_ref().filter(|t| now < t.refresh_at).map(|t| t.token.clone())
    }

    fn store(&self, token: String, expires_in: Duration, now: Instant) {
        let refresh_at = now + expires_in.saturating_sub(EXPIRY_MARGIN);
        *self.cache.write() = Some(CachedToken { token, refresh_at });
    }

    async fn request_token(&self) -> Result<TokenResponse> {
        let resp = self
            .client
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(header::ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials"), ("scope", self.scope.as_str())])
            .send()
            .await
            .context("token request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("authentication failed: HTTP {status} - {body}");
        }
        resp.json::<TokenResponse>().await.context("decoding token response")
    }
}

#[async_trait]
impl CredentialProvider for ClientCredentials {
    async fn bearer_token(&self) -> Result<String> {
        if let Some(token) = self.cached(Instant::now()) {
            return Ok(token);
        }
        tracing::info!(client_id = %self.client_id, scope = %self.scope, "requesting access token");
        let issued = self.request_token().await?;
        self.store(issued.access_token.clone(), Duration::from_secs(issued.expires_in), Instant::now());
        Ok(issued.access_token)
    }
}
