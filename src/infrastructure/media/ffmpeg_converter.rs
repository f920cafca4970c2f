use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;

use crate::application::ports::{MediaConversionError, MediaConverter};
use crate::domain::{ConvertedAudio, MediaKind};

/// Converts recordings to 16 kHz mono PCM WAV with the ffmpeg CLI. WAV input is passed through.
pub struct FfmpegConverter {
    ffmpeg_path: PathBuf,
}

impl FfmpegConverter {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("audio.wav")
        .to_string()
}

fn wav_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("audio");
    format!("{}.wav", stem)
}

fn run_ffmpeg(ffmpeg_path: &Path, input: &Path) -> Result<Vec<u8>, MediaConversionError> {
    let work_dir = tempfile::Builder::new()
        .prefix("minutes-convert-")
        .tempdir()?;
    let output = work_dir.path().join(wav_name_for(input));

    let result = Command::new(ffmpeg_path)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(["-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1", "-f", "wav"])
        .arg(&output)
        .output()
        .map_err(|e| MediaConversionError::ConversionFailed(format!("spawn ffmpeg: {}", e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let lines: Vec<&str> = stderr.lines().collect();
        let tail = lines[lines.len().saturating_sub(5)..].join("\n");
        return Err(MediaConversionError::ConversionFailed(format!(
            "ffmpeg exited with {}: {}",
            result.status, tail
        )));
    }

    Ok(std::fs::read(&output)?)
}

#[async_trait]
impl MediaConverter for FfmpegConverter {
    async fn convert(&self, input_path: &Path) -> Result<ConvertedAudio, MediaConversionError> {
        let kind = MediaKind::from_path(input_path).ok_or_else(|| {
            MediaConversionError::UnsupportedFormat(
                input_path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or_default()
                    .to_string(),
            )
        })?;

        if !kind.needs_conversion() {
            let data = tokio::fs::read(input_path).await?;
            tracing::debug!(bytes = data.len(), "WAV input passed through");
            return Ok(ConvertedAudio::new(file_name_of(input_path), data));
        }

        tracing::debug!(kind = kind.as_extension(), "Converting media to WAV");
        let ffmpeg_path = self.ffmpeg_path.clone();
        let input = input_path.to_path_buf();
        let data = tokio::task::spawn_blocking(move || run_ffmpeg(&ffmpeg_path, &input))
            .await
            .map_err(|e| MediaConversionError::ConversionFailed(format!("join: {}", e)))??;

        tracing::debug!(bytes = data.len(), "Media conversion completed");
        Ok(ConvertedAudio::new(wav_name_for(input_path), data))
    }
}
