use config::{Config, File, FileFormat};

use minutes::domain::TranscriptRendering;
use minutes::presentation::Settings;
use minutes::presentation::config::{LlmProviderSetting, StorageProviderSetting};

fn parse(toml: &str) -> Settings {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

const MINIMAL: &str = r#"
[speech]
endpoint = "https://japaneast.api.cognitive.microsoft.com"
api_key = "speech-key"

[llm]
endpoint = "https://contoso.openai.azure.com"
api_key = "llm-key"
"#;

#[test]
fn given_minimal_settings_when_loading_then_fills_defaults() {
    let settings = parse(MINIMAL);

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.server.max_upload_bytes(), 500 * 1024 * 1024);
    assert_eq!(settings.storage.provider, StorageProviderSetting::Local);
    assert_eq!(settings.speech.locale, "ja-JP");
    assert!(settings.speech.diarization);
    assert_eq!(settings.speech.poll_initial_interval_secs, 30);
    assert_eq!(settings.speech.poll_timeout_secs, 7200);
    assert_eq!(settings.speech.rendering, TranscriptRendering::BySpeaker);
    assert_eq!(settings.llm.provider, LlmProviderSetting::Azure);
    assert_eq!(settings.llm.chat_model, "gpt-4o");
    assert_eq!(settings.summarization.max_tokens_per_chunk, 7500);
    assert_eq!(settings.summarization.batch_size, 5);
    assert_eq!(settings.media.ffmpeg_path, "ffmpeg");
    assert!(settings.sharepoint.is_none());
    assert_eq!(settings.pipeline.queue_capacity, 100);
}

#[test]
fn given_overrides_when_loading_then_uses_them() {
    let settings = parse(
        r#"
[storage]
provider = "azure"
azure_account = "minutesstage"

[speech]
endpoint = "https://japaneast.api.cognitive.microsoft.com"
api_key = "speech-key"
rendering = "combined"

[llm]
provider = "openai"
api_key = "llm-key"

[sharepoint]
tenant_id = "tenant"
client_id = "client"
client_secret = "secret"
"#,
    );

    assert_eq!(settings.storage.provider, StorageProviderSetting::Azure);
    assert_eq!(settings.storage.azure_account.as_deref(), Some("minutesstage"));
    assert_eq!(settings.speech.rendering, TranscriptRendering::Combined);
    assert_eq!(settings.llm.provider, LlmProviderSetting::OpenAi);
    assert!(settings.llm.endpoint.is_none());
    let sharepoint = settings.sharepoint.unwrap();
    assert_eq!(sharepoint.graph_base_url, "https://graph.microsoft.com/v1.0");
}
