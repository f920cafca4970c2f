use std::sync::Arc;

use crate::application::ports::{
    DocumentDelivery, DocumentDeliveryError, DocumentRenderError, DocumentRenderer,
};
use crate::domain::SiteDestination;

pub struct DocumentDeliveryService {
    renderer: Arc<dyn DocumentRenderer>,
    delivery: Arc<dyn DocumentDelivery>,
}

impl DocumentDeliveryService {
    pub fn new(renderer: Arc<dyn DocumentRenderer>, delivery: Arc<dyn DocumentDelivery>) -> Self {
        Self { renderer, delivery }
    }

    pub async fn deliver(
        &self,
        destination: &SiteDestination,
        transcribed_text: &str,
        summarized_text: &str,
    ) -> Result<(), DeliveryError> {
        let document = self
            .renderer
            .render(transcribed_text, summarized_text)
            .await?;

        let site_id = self.delivery.resolve_site(&destination.site).await?;
        let folder_id = self
            .delivery
            .resolve_folder_path(&site_id, &destination.directory)
            .await?;

        self.delivery
            .upload_file(&site_id, &folder_id, document.path())
            .await?;

        tracing::info!(
            site = %destination.site,
            directory = %destination.directory,
            file = document.file_name().unwrap_or_default(),
            "Document delivered"
        );

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("document rendering: {0}")]
    Render(#[from] DocumentRenderError),
    #[error("document delivery: {0}")]
    Delivery(#[from] DocumentDeliveryError),
}
