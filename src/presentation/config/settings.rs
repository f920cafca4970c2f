use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::domain::TranscriptRendering;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub speech: SpeechSettings,
    pub llm: LlmSettings,
    #[serde(default)]
    pub summarization: SummarizationSettings,
    #[serde(default)]
    pub media: MediaSettings,
    #[serde(default)]
    pub sharepoint: Option<SharePointSettings>,
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

impl Settings {
    /// Layers `appsettings.{environment}.toml` under `APP_`-prefixed environment variables.
    /// Nested keys use a double underscore, e.g. `APP_SPEECH__API_KEY`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_size_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_size_mb: 500,
        }
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,minutes=debug,tower_http=debug".to_string(),
            enable_json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    #[default]
    Local,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
    pub azure_container: Option<String>,
    pub azure_sas_token: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            local_path: "./data/staging".to_string(),
            azure_account: None,
            azure_access_key: None,
            azure_container: None,
            azure_sas_token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_true")]
    pub diarization: bool,
    #[serde(default = "default_poll_initial_interval_secs")]
    pub poll_initial_interval_secs: u64,
    #[serde(default = "default_poll_max_interval_secs")]
    pub poll_max_interval_secs: u64,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    #[serde(default)]
    pub rendering: TranscriptRendering,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderSetting {
    #[default]
    Azure,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: LlmProviderSetting,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub api_key: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizationSettings {
    pub max_tokens_per_chunk: usize,
    pub batch_size: usize,
    pub final_reduction: bool,
    pub language: String,
}

impl Default for SummarizationSettings {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: 7500,
            batch_size: 5,
            final_reduction: true,
            language: "Japanese".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub ffmpeg_path: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharePointSettings {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
    #[serde(default = "default_login_base_url")]
    pub login_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub queue_capacity: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    "ja-JP".to_string()
}

fn default_poll_initial_interval_secs() -> u64 {
    30
}

fn default_poll_max_interval_secs() -> u64 {
    60
}

fn default_poll_timeout_secs() -> u64 {
    7200
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_max_tokens() -> usize {
    3000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_concurrent_requests() -> usize {
    10
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_login_base_url() -> String {
    "https://login.microsoftonline.com".to_string()
}
