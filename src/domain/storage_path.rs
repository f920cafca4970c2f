use std::fmt;

use super::JobId;

const FALLBACK_FILE_NAME: &str = "audio.wav";

/// Blob key for staged audio: `{job_id}/{file_name}`. The job prefix keeps uploads with
/// the same file name apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    key: String,
    file_name_start: usize,
}

impl StoragePath {
    pub fn new(job_id: &JobId, file_name: &str) -> Self {
        let file_name: String = file_name
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        let file_name = match file_name.as_str() {
            "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
            _ => file_name,
        };

        let prefix = job_id.as_uuid().to_string();
        Self {
            file_name_start: prefix.len() + 1,
            key: format!("{}/{}", prefix, file_name),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn file_name(&self) -> &str {
        &self.key[self.file_name_start..]
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
