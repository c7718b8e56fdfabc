//! Output sinks for annotated frames.

use std::path::PathBuf;

use image::RgbImage;

use crate::error::{Error, Result};

/// Consumer of annotated frames at the pipeline boundary.
///
/// A sink may also report a user-requested cancellation signal; the driver
/// polls it once per iteration (bounded, non-blocking).
pub trait FrameSink {
    fn write(&mut self, image: &RgbImage) -> Result<()>;

    /// Non-blocking cancellation poll. Default: never.
    fn cancel_requested(&mut self) -> bool {
        false
    }
}

/// Writes annotated frames as numbered PNG files into a directory.
pub struct ImageDirSink {
    dir: PathBuf,
    next_index: u64,
}

impl ImageDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            Error::configuration(format!(
                "failed to create output directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir, next_index: 0 })
    }
}

impl FrameSink for ImageDirSink {
    fn write(&mut self, image: &RgbImage) -> Result<()> {
        let path = self.dir.join(format!("frame_{:06}.png", self.next_index));
        image
            .save(&path)
            .map_err(|e| Error::stream(format!("failed to write {}: {}", path.display(), e)))?;
        self.next_index += 1;
        Ok(())
    }
}

/// Discards frames; counts them. For tests and dry runs.
#[derive(Default)]
pub struct NullSink {
    frames: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for NullSink {
    fn write(&mut self, _image: &RgbImage) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_dir_sink_writes_numbered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ImageDirSink::new(dir.path().join("out")).unwrap();
        let image = RgbImage::new(8, 8);

        sink.write(&image).unwrap();
        sink.write(&image).unwrap();

        assert!(dir.path().join("out/frame_000000.png").exists());
        assert!(dir.path().join("out/frame_000001.png").exists());
    }

    #[test]
    fn null_sink_counts_frames() {
        let mut sink = NullSink::new();
        let image = RgbImage::new(2, 2);
        sink.write(&image).unwrap();
        sink.write(&image).unwrap();
        assert_eq!(sink.frames_written(), 2);
    }
}
