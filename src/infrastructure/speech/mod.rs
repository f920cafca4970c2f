mod azure_speech_client;

pub use azure_speech_client::AzureSpeechClient;
