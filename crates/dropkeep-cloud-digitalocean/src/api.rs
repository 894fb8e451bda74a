//! DigitalOcean v2 API client
//!
//! Thin wrapper over the REST endpoints Dropkeep needs. Responses are
//! returned as wire types; conversion into the provider model happens in
//! [`crate::provider`].

use crate::error::{DigitalOceanError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2";
const PER_PAGE: u32 = 200;

/// Authenticated DigitalOcean API client
pub struct DigitalOceanApi {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl DigitalOceanApi {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DIGITALOCEAN_API_BASE)
    }

    /// Client talking to another endpoint (proxies, API mocks)
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);
        let body = self.send(self.client.get(url)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, payload: &B) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let body = self.send(self.client.post(&url).json(payload)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }

    /// Fetch every page of a collection endpoint. `key` names the array in
    /// the response body (e.g. "droplets").
    async fn list_all<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut next = Some(self.url(&format!("{}{}per_page={}", path, separator, PER_PAGE)));
        let mut items = Vec::new();

        while let Some(url) = next.take() {
            let mut page: serde_json::Value = self.get(&url).await?;
            let batch: Vec<T> = match page.get_mut(key) {
                Some(value) => serde_json::from_value(value.take())?,
                None => Vec::new(),
            };
            items.extend(batch);

            let links: Links = match page.get_mut("links") {
                Some(value) => serde_json::from_value(value.take())?,
                None => Links::default(),
            };
            next = links.next_page();
        }

        Ok(items)
    }

    pub async fn list_droplets(&self) -> Result<Vec<ApiDroplet>> {
        self.list_all("/droplets", "droplets").await
    }

    pub async fn get_droplet(&self, id: u64) -> Result<ApiDroplet> {
        let response: DropletResponse = self.get(&self.url(&format!("/droplets/{}", id))).await?;
        Ok(response.droplet)
    }

    /// Images owned by the account (snapshots and backups)
    pub async fn list_images(&self) -> Result<Vec<ApiImage>> {
        self.list_all("/images?private=true", "images").await
    }

    pub async fn list_ssh_keys(&self) -> Result<Vec<ApiSshKey>> {
        self.list_all("/account/keys", "ssh_keys").await
    }

    /// Create a droplet. Returns the provisional droplet and the id of the
    /// action tracking its creation.
    pub async fn create_droplet(&self, request: &CreateDropletBody) -> Result<(ApiDroplet, u64)> {
        let response: CreateDropletResponse = self.post("/droplets", request).await?;
        let action_id = response
            .links
            .actions
            .iter()
            .find(|a| a.rel == "create")
            .map(|a| a.id)
            .ok_or(DigitalOceanError::MissingCreateAction)?;
        Ok((response.droplet, action_id))
    }

    /// Run a droplet action (shutdown, snapshot, ...)
    pub async fn droplet_action(&self, id: u64, action: &DropletActionBody) -> Result<ApiAction> {
        let response: ActionResponse = self
            .post(&format!("/droplets/{}/actions", id), action)
            .await?;
        Ok(response.action)
    }

    pub async fn get_action(&self, id: u64) -> Result<ApiAction> {
        let response: ActionResponse = self.get(&self.url(&format!("/actions/{}", id))).await?;
        Ok(response.action)
    }

    pub async fn delete_droplet(&self, id: u64) -> Result<()> {
        self.delete(&format!("/droplets/{}", id)).await
    }

    pub async fn delete_image(&self, id: u64) -> Result<()> {
        self.delete(&format!("/images/{}", id)).await
    }
}

/// Map a non-2xx response to an error
pub fn classify_error(status: u16, body: &str) -> DigitalOceanError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_else(|_| ApiErrorBody {
        id: "unknown".to_string(),
        message: body.trim().to_string(),
    });

    match status {
        401 => DigitalOceanError::Unauthorized(parsed.message),
        422 if parsed.message.to_lowercase().contains("already powered off") => {
            DigitalOceanError::AlreadyPoweredOff(parsed.message)
        }
        _ => DigitalOceanError::Api {
            status,
            id: parsed.id,
            message: parsed.message,
        },
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
    #[serde(default)]
    actions: Vec<ActionLink>,
}

impl Links {
    fn next_page(self) -> Option<String> {
        self.pages.and_then(|p| p.next)
    }
}

#[derive(Debug, Default, Deserialize)]
struct Pages {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ActionLink {
    id: u64,
    rel: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDroplet {
    pub id: u64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub networks: ApiNetworks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiNetworks {
    #[serde(default)]
    pub v4: Vec<ApiNetworkV4>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiNetworkV4 {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSshKey {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fingerprint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAction {
    pub id: u64,
    pub status: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Deserialize)]
struct DropletResponse {
    droplet: ApiDroplet,
}

#[derive(Debug, Deserialize)]
struct CreateDropletResponse {
    droplet: ApiDroplet,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    action: ApiAction,
}

#[derive(Debug, Serialize)]
pub struct CreateDropletBody {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: u64,
    pub ssh_keys: Vec<u64>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropletActionBody {
    Shutdown,
    Snapshot { name: String },
}
