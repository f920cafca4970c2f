use std::fs::File;
use std::path::Path;

use async_trait::async_trait;
use chrono::Local;
use docx_rs::{Docx, Paragraph, Run};

use crate::application::ports::{DocumentRenderError, DocumentRenderer, GeneratedDocument};

const TITLE: &str = "Meeting Minutes";
const SUMMARY_HEADING: &str = "Summary";
const TRANSCRIPT_HEADING: &str = "Transcript";

// Run sizes are in half-points.
const TITLE_SIZE: usize = 36;
const HEADING_SIZE: usize = 28;

/// Writes minutes as a Word document named after the local time of rendering.
#[derive(Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn file_name_now() -> String {
        format!("{}_minutes.docx", Local::now().format("%Y_%m%d_%H%M"))
    }
}

fn heading(text: &str, size: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(size))
}

fn with_lines(mut docx: Docx, text: &str) -> Docx {
    for line in text.lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }
    docx
}

fn write_docx(
    path: &Path,
    transcribed_text: &str,
    summarized_text: &str,
) -> Result<(), DocumentRenderError> {
    let mut docx = Docx::new()
        .add_paragraph(heading(TITLE, TITLE_SIZE))
        .add_paragraph(heading(SUMMARY_HEADING, HEADING_SIZE));
    docx = with_lines(docx, summarized_text);
    docx = docx.add_paragraph(heading(TRANSCRIPT_HEADING, HEADING_SIZE));
    docx = with_lines(docx, transcribed_text);

    let file = File::create(path)?;
    docx.build()
        .pack(file)
        .map_err(|e| DocumentRenderError::RenderFailed(e.to_string()))
}

#[async_trait]
impl DocumentRenderer for DocxRenderer {
    async fn render(
        &self,
        transcribed_text: &str,
        summarized_text: &str,
    ) -> Result<GeneratedDocument, DocumentRenderError> {
        if summarized_text.trim().is_empty() {
            return Err(DocumentRenderError::MissingContent("summary".to_string()));
        }

        let dir = tempfile::Builder::new().prefix("minutes-doc-").tempdir()?;
        let document = GeneratedDocument::new(dir, &Self::file_name_now());

        let path = document.path().to_path_buf();
        let transcribed_text = transcribed_text.to_string();
        let summarized_text = summarized_text.to_string();
        tokio::task::spawn_blocking(move || write_docx(&path, &transcribed_text, &summarized_text))
            .await
            .map_err(|e| DocumentRenderError::RenderFailed(format!("join: {}", e)))??;

        tracing::debug!(path = %document.path().display(), "Rendered minutes document");
        Ok(document)
    }
}
