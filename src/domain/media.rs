use std::path::Path;

use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Wav,
    Mp4,
    M4a,
    Mp3,
}

impl MediaKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp4" => Some(Self::Mp4),
            "m4a" => Some(Self::M4a),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn needs_conversion(&self) -> bool {
        !matches!(self, Self::Wav)
    }

    pub fn as_extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
            Self::Mp3 => "mp3",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertedAudio {
    pub file_name: String,
    pub data: Bytes,
}

impl ConvertedAudio {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}
