use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::azure_store::AzureStagingStore;
use super::local_store::LocalStagingStore;

pub struct StagingStoreFactory;

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, StagingStoreError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StagingStoreError::Configuration(format!("storage.{} required", key)))
}

impl StagingStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn StagingStore>, StagingStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let store = LocalStagingStore::new(PathBuf::from(&settings.local_path))?;
                tracing::warn!(
                    path = %settings.local_path,
                    "Using local staging; file:// URLs are not reachable by the speech service"
                );
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Azure => {
                let account = required(&settings.azure_account, "azure_account")?;
                let key = required(&settings.azure_access_key, "azure_access_key")?;
                let container = required(&settings.azure_container, "azure_container")?;
                let store = AzureStagingStore::new(
                    account,
                    key,
                    container,
                    settings.azure_sas_token.as_deref(),
                )?;
                tracing::info!(account = %account, container = %container, "Using Azure blob staging");
                Ok(Arc::new(store))
            }
        }
    }
}
