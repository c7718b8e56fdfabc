//! Clip extraction via the external `ffmpeg` tool.
//!
//! Independent of the detection pipeline; trims a time range out of a video
//! file with a stream copy (no re-encode).

use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};

/// A single trim request.
#[derive(Clone, Debug)]
pub struct ClipRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl ClipRequest {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        start_secs: f64,
        end_secs: f64,
    ) -> Result<Self> {
        if start_secs < 0.0 {
            return Err(Error::configuration("clip start time must be non-negative"));
        }
        if end_secs <= start_secs {
            return Err(Error::configuration(format!(
                "clip end time {:.3}s must be after start time {:.3}s",
                end_secs, start_secs
            )));
        }
        Ok(Self {
            input: input.into(),
            output: output.into(),
            start_secs,
            end_secs,
        })
    }

    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Build the ffmpeg argument vector for a request. Split out for testing.
fn ffmpeg_args(request: &ClipRequest) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-ss".to_string(),
        format!("{:.3}", request.start_secs),
        "-t".to_string(),
        format!("{:.3}", request.duration_secs()),
        "-i".to_string(),
        request.input.to_string_lossy().into_owned(),
        "-c".to_string(),
        "copy".to_string(),
        request.output.to_string_lossy().into_owned(),
    ]
}

/// Produce a trimmed copy of a video file.
pub fn extract_clip(request: &ClipRequest) -> Result<()> {
    if !request.input.exists() {
        return Err(Error::configuration(format!(
            "input video {} does not exist",
            request.input.display()
        )));
    }

    log::info!(
        "trimming {} -> {} ({:.3}s..{:.3}s)",
        request.input.display(),
        request.output.display(),
        request.start_secs,
        request.end_secs
    );

    let output = Command::new("ffmpeg")
        .args(ffmpeg_args(request))
        .output()
        .map_err(|e| Error::stream(format!("failed to launch ffmpeg: {}", e)))?;

    if !output.status.success() {
        return Err(Error::stream(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    log::info!("wrote {}", request.output.display());
    Ok(())
}

/// Parse a timestamp given as plain seconds ("12.5") or "HH:MM:SS(.mmm)".
pub fn parse_timestamp(ts: &str) -> Result<f64> {
    let invalid = || Error::configuration(format!("invalid timestamp '{}'", ts));

    let parts: Vec<&str> = ts.split(':').collect();
    match parts.as_slice() {
        [secs] => secs.parse().map_err(|_| invalid()),
        [h, m, s] => {
            let hours: f64 = h.parse().map_err(|_| invalid())?;
            let minutes: f64 = m.parse().map_err(|_| invalid())?;
            let seconds: f64 = s.parse().map_err(|_| invalid())?;
            Ok(hours * 3600.0 + minutes * 60.0 + seconds)
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamps() {
        assert!((parse_timestamp("00:00:00").unwrap()).abs() < 0.001);
        assert!((parse_timestamp("00:01:00").unwrap() - 60.0).abs() < 0.001);
        assert!((parse_timestamp("01:00:30.500").unwrap() - 3630.5).abs() < 0.001);
        assert!((parse_timestamp("12.5").unwrap() - 12.5).abs() < 0.001);
        assert!(parse_timestamp("1:2").is_err());
        assert!(parse_timestamp("abc").is_err());
    }

    #[test]
    fn rejects_inverted_ranges() {
        let err = ClipRequest::new("in.mp4", "out.mp4", 10.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        let err = ClipRequest::new("in.mp4", "out.mp4", -1.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn builds_stream_copy_argv() {
        let request = ClipRequest::new("videos/test.mp4", "videos/output.mp4", 0.0, 10.0).unwrap();
        let args = ffmpeg_args(&request);
        assert_eq!(
            args,
            vec![
                "-y", "-ss", "0.000", "-t", "10.000", "-i", "videos/test.mp4", "-c", "copy",
                "videos/output.mp4",
            ]
        );
    }

    #[test]
    fn missing_input_is_a_configuration_error() {
        let request = ClipRequest::new("/nonexistent/in.mp4", "out.mp4", 0.0, 1.0).unwrap();
        let err = extract_clip(&request).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
