mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LlmProviderSetting, LlmSettings, LoggingSettings, MediaSettings, PipelineSettings,
    ServerSettings, Settings, SharePointSettings, SpeechSettings, StorageProviderSetting,
    StorageSettings, SummarizationSettings,
};
