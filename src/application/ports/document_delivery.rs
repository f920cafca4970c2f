use std::io;
use std::path::Path;

use async_trait::async_trait;

pub const ROOT_FOLDER_ID: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub id: String,
    pub name: String,
    pub child_count: Option<u64>,
}

#[async_trait]
pub trait DocumentDelivery: Send + Sync {
    async fn list_sites(&self) -> Result<Vec<SiteSummary>, DocumentDeliveryError>;

    async fn list_folders(
        &self,
        site_id: &str,
        parent_id: &str,
    ) -> Result<Vec<FolderSummary>, DocumentDeliveryError>;

    async fn upload_file(
        &self,
        site_id: &str,
        folder_id: &str,
        local_path: &Path,
    ) -> Result<(), DocumentDeliveryError>;

    /// Looks up a folder by its drive item id. `None` when no such item exists or the
    /// item is not a folder.
    async fn find_folder(
        &self,
        site_id: &str,
        folder_id: &str,
    ) -> Result<Option<FolderSummary>, DocumentDeliveryError>;

    /// Accepts a site id, a site name or a display name, matched in that order.
    async fn resolve_site(&self, site: &str) -> Result<String, DocumentDeliveryError> {
        let sites = self.list_sites().await?;
        sites
            .iter()
            .find(|s| s.id == site)
            .or_else(|| sites.iter().find(|s| s.name == site))
            .or_else(|| sites.iter().find(|s| s.display_name.as_deref() == Some(site)))
            .map(|s| s.id.clone())
            .ok_or_else(|| DocumentDeliveryError::SiteNotFound(site.to_string()))
    }

    /// Walks `/`-separated folder names starting at the drive root. A single segment that
    /// names no root folder is tried as a folder id.
    async fn resolve_folder_path(
        &self,
        site_id: &str,
        path: &str,
    ) -> Result<String, DocumentDeliveryError> {
        let candidate_id = path.trim();
        match walk_folder_names(self, site_id, path).await {
            Err(DocumentDeliveryError::FolderNotFound(_))
                if !candidate_id.is_empty()
                    && !candidate_id.contains('/')
                    && candidate_id != ROOT_FOLDER_ID =>
            {
                self.find_folder(site_id, candidate_id)
                    .await?
                    .map(|folder| folder.id)
                    .ok_or_else(|| DocumentDeliveryError::FolderNotFound(path.to_string()))
            }
            walked => walked,
        }
    }
}

async fn walk_folder_names<D: DocumentDelivery + ?Sized>(
    delivery: &D,
    site_id: &str,
    path: &str,
) -> Result<String, DocumentDeliveryError> {
    let mut folder_id = ROOT_FOLDER_ID.to_string();

    for segment in path.split('/').filter(|s| !s.trim().is_empty()) {
        let segment = segment.trim();
        let children = delivery.list_folders(site_id, &folder_id).await?;
        folder_id = children
            .into_iter()
            .find(|folder| folder.name == segment)
            .map(|folder| folder.id)
            .ok_or_else(|| DocumentDeliveryError::FolderNotFound(path.to_string()))?;
    }

    if folder_id == ROOT_FOLDER_ID {
        return Err(DocumentDeliveryError::FolderNotFound(path.to_string()));
    }

    Ok(folder_id)
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentDeliveryError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("site not found: {0}")]
    SiteNotFound(String),
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
