use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptionJobStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl TranscriptionJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl FromStr for TranscriptionJobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotStarted" => Ok(Self::NotStarted),
            "Running" => Ok(Self::Running),
            "Succeeded" => Ok(Self::Succeeded),
            "Failed" => Ok(Self::Failed),
            "Cancelled" | "Canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid transcription status: {}", s)),
        }
    }
}

impl fmt::Display for TranscriptionJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedPhrase {
    pub speaker: Option<u32>,
    pub text: String,
}

impl RecognizedPhrase {
    pub fn new(speaker: Option<u32>, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptRendering {
    Combined,
    #[default]
    BySpeaker,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptContent {
    pub combined: Vec<String>,
    pub phrases: Vec<RecognizedPhrase>,
}

impl TranscriptContent {
    pub fn render(&self, rendering: TranscriptRendering) -> String {
        match rendering {
            TranscriptRendering::BySpeaker if !self.phrases.is_empty() => {
                render_by_speaker(&self.phrases)
            }
            _ => self.combined.join("\n"),
        }
    }
}

/// Groups contiguous phrases of one speaker into a block headed by the speaker tag.
pub fn render_by_speaker(phrases: &[RecognizedPhrase]) -> String {
    let mut blocks: Vec<(Option<u32>, String)> = Vec::new();

    for phrase in phrases {
        match blocks.last_mut() {
            Some((speaker, text)) if *speaker == phrase.speaker => text.push_str(&phrase.text),
            _ => blocks.push((phrase.speaker, phrase.text.clone())),
        }
    }

    blocks
        .iter()
        .map(|(speaker, text)| format!("{}\n{}", speaker_header(*speaker), text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn speaker_header(speaker: Option<u32>) -> String {
    match speaker {
        Some(n) => format!("[Speaker {}]", n),
        None => "[Speaker ?]".to_string(),
    }
}
