mod ffmpeg_converter;

pub use ffmpeg_converter::FfmpegConverter;
