//! Video frame sources.
//!
//! A `VideoSource` yields a lazy, finite sequence of frames from a named
//! input and signals exhaustion with `Error::EndOfStream`. Restart only by
//! re-opening.
//!
//! Inputs:
//! - `stub://<n>`: synthetic source producing `n` frames (testing).
//! - local file paths: require the `ingest-file-ffmpeg` feature.

#[cfg(feature = "ingest-file-ffmpeg")]
mod ffmpeg;
mod synthetic;

#[cfg(feature = "ingest-file-ffmpeg")]
use ffmpeg::FfmpegSource;
use synthetic::SyntheticSource;

use crate::error::{Error, Result};
use crate::frame::Frame;

/// Configuration for a video source.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Input path, e.g. "videos/intersection.mp4" or "stub://3".
    pub input: String,
}

/// Frame source over a named video input.
pub struct VideoSource {
    backend: SourceBackend,
}

enum SourceBackend {
    Synthetic(SyntheticSource),
    #[cfg(feature = "ingest-file-ffmpeg")]
    Ffmpeg(FfmpegSource),
}

impl VideoSource {
    pub fn open(config: &SourceConfig) -> Result<Self> {
        if !is_local_input(&config.input) {
            return Err(Error::configuration(
                "video ingestion only supports local paths (no URL schemes)",
            ));
        }
        if let Some(rest) = config.input.strip_prefix("stub://") {
            let source = SyntheticSource::new(rest)?;
            return Ok(Self {
                backend: SourceBackend::Synthetic(source),
            });
        }

        #[cfg(feature = "ingest-file-ffmpeg")]
        {
            Ok(Self {
                backend: SourceBackend::Ffmpeg(FfmpegSource::open(&config.input)?),
            })
        }
        #[cfg(not(feature = "ingest-file-ffmpeg"))]
        {
            Err(Error::configuration(
                "reading video files requires the ingest-file-ffmpeg feature",
            ))
        }
    }

    /// Pull the next frame. `Err(EndOfStream)` is the normal termination
    /// condition, not a failure.
    pub fn next_frame(&mut self) -> Result<Frame> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.next_frame(),
            #[cfg(feature = "ingest-file-ffmpeg")]
            SourceBackend::Ffmpeg(source) => source.next_frame(),
        }
    }

    /// Frames produced so far.
    pub fn frames_produced(&self) -> u64 {
        match &self.backend {
            SourceBackend::Synthetic(source) => source.frames_produced(),
            #[cfg(feature = "ingest-file-ffmpeg")]
            SourceBackend::Ffmpeg(source) => source.frames_produced(),
        }
    }
}

fn is_local_input(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }
    input.starts_with("stub://") || !input.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_remote_urls() {
        let err = VideoSource::open(&SourceConfig {
            input: "rtsp://camera".to_string(),
        })
        .err()
        .unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn stub_source_is_finite() {
        let mut source = VideoSource::open(&SourceConfig {
            input: "stub://3".to_string(),
        })
        .unwrap();

        for _ in 0..3 {
            source.next_frame().unwrap();
        }
        assert!(source.next_frame().unwrap_err().is_end_of_stream());
        // Still exhausted on repeat polls.
        assert!(source.next_frame().unwrap_err().is_end_of_stream());
        assert_eq!(source.frames_produced(), 3);
    }
}
