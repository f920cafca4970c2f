use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::ConvertedAudio;

#[async_trait]
pub trait MediaConverter: Send + Sync {
    async fn convert(&self, input_path: &Path) -> Result<ConvertedAudio, MediaConversionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaConversionError {
    #[error("unsupported media format: {0}")]
    UnsupportedFormat(String),
    #[error("conversion failed: {0}")]
    ConversionFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
