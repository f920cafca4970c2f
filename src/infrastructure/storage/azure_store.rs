use std::sync::Arc;

use bytes::Bytes;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use reqwest::Url;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Azure Blob Storage container holding converted audio until the speech service has read it.
pub struct AzureStagingStore {
    inner: Arc<dyn ObjectStore>,
    container_url: Url,
    sas_token: Option<String>,
}

impl AzureStagingStore {
    pub fn new(
        account: &str,
        access_key: &str,
        container: &str,
        sas_token: Option<&str>,
    ) -> Result<Self, StagingStoreError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| StagingStoreError::Configuration(e.to_string()))?;

        let container_url =
            Url::parse(&format!("https://{}.blob.core.windows.net/{}", account, container))
                .map_err(|e| StagingStoreError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
            container_url,
            sas_token: sas_token
                .map(|token| token.trim_start_matches('?').to_string())
                .filter(|token| !token.is_empty()),
        })
    }

    /// URL of the blob stored under `path`, encoded the same way the object store
    /// addresses it, with the SAS token (if any) as the query.
    pub fn blob_url(&self, path: &StoragePath) -> String {
        let store_path = StorePath::from(path.as_str());
        let mut url = self.container_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(store_path.parts());
        }
        url.set_query(self.sas_token.as_deref());
        url.into()
    }
}

#[async_trait::async_trait]
impl StagingStore for AzureStagingStore {
    async fn upload(&self, path: &StoragePath, data: Bytes) -> Result<String, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;

        Ok(self.blob_url(path))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| StagingStoreError::DeleteFailed(e.to_string()))
    }
}
