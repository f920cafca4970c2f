use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::application::ports::{DocumentDelivery, DocumentDeliveryError, FolderSummary, SiteSummary};
use crate::presentation::config::SharePointSettings;

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// SharePoint document libraries through Microsoft Graph, authenticated with the
/// client-credentials grant.
pub struct GraphClient {
    client: Client,
    graph_base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteResource {
    id: String,
    #[serde(default)]
    name: String,
    display_name: Option<String>,
    web_url: Option<String>,
}

#[derive(Deserialize)]
struct DriveItemResource {
    id: String,
    name: String,
    folder: Option<FolderFacet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderFacet {
    child_count: Option<u64>,
}

impl GraphClient {
    pub fn new(settings: &SharePointSettings) -> Self {
        Self {
            client: Client::new(),
            graph_base_url: settings.graph_base_url.trim_end_matches('/').to_string(),
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                settings.login_base_url.trim_end_matches('/'),
                settings.tenant_id
            ),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, DocumentDeliveryError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting Graph access token");
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| DocumentDeliveryError::AuthenticationFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocumentDeliveryError::AuthenticationFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DocumentDeliveryError::AuthenticationFailed(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    async fn get_all<T: DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<Vec<T>, DocumentDeliveryError> {
        let mut items = Vec::new();
        let mut next = Some(url);

        while let Some(url) = next {
            let token = self.access_token().await?;
            let response = self
                .client
                .get(&url)
                .bearer_auth(token)
                .send()
                .await
                .map_err(|e| DocumentDeliveryError::ApiRequestFailed(e.to_string()))?;

            let page: Page<T> = parse_json(response).await?;
            items.extend(page.value);
            next = page.next_link;
        }

        Ok(items)
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, DocumentDeliveryError> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| DocumentDeliveryError::InvalidResponse(e.to_string()))
}

async fn check_status(response: Response) -> Result<Response, DocumentDeliveryError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(DocumentDeliveryError::UnexpectedStatus { status, body })
}

#[async_trait]
impl DocumentDelivery for GraphClient {
    async fn list_sites(&self) -> Result<Vec<SiteSummary>, DocumentDeliveryError> {
        let sites: Vec<SiteResource> = self
            .get_all(format!("{}/sites?search=*", self.graph_base_url))
            .await?;

        Ok(sites
            .into_iter()
            .map(|site| SiteSummary {
                id: site.id,
                name: site.name,
                display_name: site.display_name,
                web_url: site.web_url,
            })
            .collect())
    }

    async fn list_folders(
        &self,
        site_id: &str,
        parent_id: &str,
    ) -> Result<Vec<FolderSummary>, DocumentDeliveryError> {
        let items: Vec<DriveItemResource> = self
            .get_all(format!(
                "{}/sites/{}/drive/items/{}/children",
                self.graph_base_url, site_id, parent_id
            ))
            .await?;

        Ok(items
            .into_iter()
            .filter_map(|item| {
                item.folder.map(|facet| FolderSummary {
                    id: item.id,
                    name: item.name,
                    child_count: facet.child_count,
                })
            })
            .collect())
    }

    async fn find_folder(
        &self,
        site_id: &str,
        folder_id: &str,
    ) -> Result<Option<FolderSummary>, DocumentDeliveryError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(format!(
                "{}/sites/{}/drive/items/{}",
                self.graph_base_url, site_id, folder_id
            ))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DocumentDeliveryError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let item: DriveItemResource = parse_json(response).await?;
        Ok(item.folder.map(|facet| FolderSummary {
            id: item.id,
            name: item.name,
            child_count: facet.child_count,
        }))
    }

    async fn upload_file(
        &self,
        site_id: &str,
        folder_id: &str,
        local_path: &Path,
    ) -> Result<(), DocumentDeliveryError> {
        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                DocumentDeliveryError::InvalidResponse(format!(
                    "invalid file name: {}",
                    local_path.display()
                ))
            })?;
        let data = tokio::fs::read(local_path).await?;
        let url = format!(
            "{}/sites/{}/drive/items/{}:/{}:/content",
            self.graph_base_url, site_id, folder_id, file_name
        );

        let token = self.access_token().await?;
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .body(data)
            .send()
            .await
            .map_err(|e| DocumentDeliveryError::ApiRequestFailed(e.to_string()))?;

        check_status(response).await?;
        tracing::debug!(file = %file_name, folder_id = %folder_id, "Uploaded file to SharePoint");
        Ok(())
    }
}
