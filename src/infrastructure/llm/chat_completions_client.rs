use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::ChatMessage;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::{LlmProviderSetting, LlmSettings};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completions against Azure OpenAI or OpenAI. Every call holds a permit from a
/// semaphore shared by all jobs in the process.
pub struct ChatCompletionsClient {
    client: Client,
    provider: LlmProviderSetting,
    url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
    permits: Arc<Semaphore>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsClient {
    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.provider {
            LlmProviderSetting::Azure => request.header("api-key", &self.api_key),
            LlmProviderSetting::OpenAi => request.bearer_auth(&self.api_key),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmClientError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if let Some(last) = messages.last() {
            tracing::debug!(
                model = %self.model,
                messages = messages.len(),
                prompt = %sanitize_prompt(&last.content),
                "Requesting chat completion"
            );
        }

        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let request = self.client.post(&self.url).json(&request_body);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))
    }
}

pub fn create_llm_client(settings: &LlmSettings) -> Result<ChatCompletionsClient, LlmClientError> {
    let url = match settings.provider {
        LlmProviderSetting::OpenAi => {
            let base_url = settings.endpoint.as_deref().unwrap_or(OPENAI_BASE_URL);
            format!("{}/chat/completions", base_url.trim_end_matches('/'))
        }
        LlmProviderSetting::Azure => {
            let endpoint = settings.endpoint.as_deref().ok_or_else(|| {
                LlmClientError::Configuration("endpoint required for azure provider".to_string())
            })?;
            format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                settings.chat_model,
                settings.api_version
            )
        }
    };

    Ok(ChatCompletionsClient {
        client: Client::new(),
        provider: settings.provider,
        url,
        api_key: settings.api_key.clone(),
        model: settings.chat_model.clone(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        permits: Arc::new(Semaphore::new(settings.max_concurrent_requests.max(1))),
    })
}
