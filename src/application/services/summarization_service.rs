use std::sync::Arc;

use futures::future::join_all;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::TextChunk;

use super::summary_prompt::build_summary_prompt;
use super::token_chunker::{ChunkingError, split_by_tokens};

#[derive(Debug, Clone)]
pub struct SummarizationConfig {
    pub max_tokens_per_chunk: usize,
    pub batch_size: usize,
    pub final_reduction: bool,
    pub language: String,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: 7500,
            batch_size: 5,
            final_reduction: true,
            language: "Japanese".to_string(),
        }
    }
}

pub struct SummarizationService {
    llm_client: Arc<dyn LlmClient>,
    config: SummarizationConfig,
}

impl SummarizationService {
    pub fn new(llm_client: Arc<dyn LlmClient>, config: SummarizationConfig) -> Self {
        Self { llm_client, config }
    }

    pub async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        let chunks = split_by_tokens(text, self.config.max_tokens_per_chunk)?;
        if chunks.is_empty() {
            return Err(SummarizationError::EmptyInput);
        }

        tracing::debug!(
            chunks = chunks.len(),
            batch_size = self.config.batch_size,
            "Summarizing transcript"
        );

        let summaries = self.summarize_in_batches(&chunks).await?;
        let combined = summaries.join("\n");

        if !self.config.final_reduction {
            return Ok(combined);
        }

        self.summarize_text(&combined)
            .await
            .map_err(SummarizationError::Completion)
    }

    /// Batches run one after another; chunks inside a batch run concurrently. A failed chunk
    /// is dropped, and only a run where every chunk failed is an error.
    async fn summarize_in_batches(
        &self,
        chunks: &[TextChunk],
    ) -> Result<Vec<String>, SummarizationError> {
        let mut summaries = Vec::with_capacity(chunks.len());
        let mut last_error = None;

        for batch in chunks.chunks(self.config.batch_size.max(1)) {
            let results = join_all(batch.iter().map(|chunk| self.summarize_chunk(chunk))).await;

            for (chunk, result) in batch.iter().zip(results) {
                match result {
                    Ok(summary) => summaries.push(summary),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            chunk_index = chunk.index,
                            "Chunk summary failed, dropping chunk"
                        );
                        last_error = Some(e);
                    }
                }
            }
        }

        if summaries.is_empty() {
            let reason = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no summaries produced".to_string());
            return Err(SummarizationError::AllChunksFailed(reason));
        }

        Ok(summaries)
    }

    async fn summarize_chunk(&self, chunk: &TextChunk) -> Result<String, LlmClientError> {
        tracing::debug!(
            chunk_index = chunk.index,
            tokens = chunk.token_count,
            "Requesting chunk summary"
        );
        self.summarize_text(&chunk.text).await
    }

    async fn summarize_text(&self, text: &str) -> Result<String, LlmClientError> {
        let messages = build_summary_prompt(text, &self.config.language);
        self.llm_client.complete(&messages).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    #[error("summarization failed: input text is empty")]
    EmptyInput,
    #[error("summarization failed: {0}")]
    Chunking(#[from] ChunkingError),
    #[error("summarization failed: every chunk failed, last error: {0}")]
    AllChunksFailed(String),
    #[error("summarization failed: {0}")]
    Completion(LlmClientError),
}
