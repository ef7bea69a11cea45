use anyhow::{anyhow, bail, Context, Result};
use engine::SkillCatalog;
use reqwest::{header, Client, Url};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::CredentialProvider;
use crate::file::names_from_value;

pub const DEFAULT_SKILLS_URL: &str = "https://emsiservices.com/skills/versions/latest";
pub const DEFAULT_AUTH_URL: &str = "https://auth.emsicloud.com/connect/token";
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn build_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("skill-catalog/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Client for the remote skills directory.
pub struct RemoteCatalog {
    client: Client,
    skills_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl RemoteCatalog {
    pub fn new(client: Client, base_url: &str, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let skills_url = skills_url(base_url)?;
        Ok(Self { client, skills_url, credentials })
    }

    pub fn skills_url(&self) -> &Url {
        &self.skills_url
    }

    /// Download every skill name the service knows.
    pub async fn fetch(&self) -> Result<SkillCatalog> {
        let token = self.credentials.bearer_token().await?;
        let resp = self
            .client
            .get(self.skills_url.clone())
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("GET {}", self.skills_url))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("failed to fetch skills: HTTP {status} - {body}");
        }
        let value: Value = resp.json().await.context("decoding skills response")?;
        let catalog = catalog_from_response(&value)?;
        tracing::info!(url = %self.skills_url, skills = catalog.len(), "fetched skill catalog");
        Ok(catalog)
    }
}

pub fn catalog_from_response(value: &Value) -> Result<SkillCatalog> {
    let names = names_from_value(value).ok_or_else(|| {
        let fields: Vec<&str> = value.as_object().map(|o| o.keys().map(String::as_str).collect()).unwrap_or_default();
        anyhow!("no skills array in response (fields: {})", fields.join(", "))
    })?;
    Ok(names.into_iter().collect())
}

fn skills_url(base_url: &str) -> Result<Url> {
    let url = format!("{}/skills", base_url.trim_end_matches('/'));
    Url::parse(&url).with_context(|| format!("invalid skills service url {base_url:?}"))
}
