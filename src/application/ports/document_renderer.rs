use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(
        &self,
        transcribed_text: &str,
        summarized_text: &str,
    ) -> Result<GeneratedDocument, DocumentRenderError>;
}

/// A rendered file living in its own temporary directory, removed when dropped.
#[derive(Debug)]
pub struct GeneratedDocument {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl GeneratedDocument {
    pub fn new(dir: TempDir, file_name: &str) -> Self {
        Self {
            path: dir.path().join(file_name),
            dir: Some(dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

impl Drop for GeneratedDocument {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => tracing::debug!(path = %self.path.display(), "Removed generated document"),
                Err(e) => tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to remove generated document"
                ),
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentRenderError {
    #[error("missing content: {0}")]
    MissingContent(String),
    #[error("render failed: {0}")]
    RenderFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
