//! The pipeline driver.
//!
//! Sequential, single-threaded, frame at a time: pull frame → detect →
//! trigger zones → annotate → resize → sink. Cancellation is cooperative and
//! checked once per iteration; `EndOfStream` ends the loop normally.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::annotate::FrameAnnotator;
use crate::detect::Detector;
use crate::error::{Error, Result};
use crate::sink::FrameSink;
use crate::source::VideoSource;
use crate::zone::ZoneSet;

/// Shared cooperative cancellation flag, set from e.g. a Ctrl-C handler.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Driver options beyond the component wiring.
#[derive(Clone, Debug, Default)]
pub struct PipelineOptions {
    /// Resize annotated frames to this resolution before the sink.
    pub output_size: Option<(u32, u32)>,
    /// Where to persist the first frame as a zone-authoring aid.
    pub snapshot_path: Option<PathBuf>,
}

/// Outcome of a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub cancelled: bool,
}

pub struct Pipeline {
    source: VideoSource,
    detector: Detector,
    zones: ZoneSet,
    annotator: Box<dyn FrameAnnotator>,
    sink: Box<dyn FrameSink>,
    cancel: CancelToken,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        source: VideoSource,
        detector: Detector,
        zones: ZoneSet,
        annotator: Box<dyn FrameAnnotator>,
        sink: Box<dyn FrameSink>,
        cancel: CancelToken,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            detector,
            zones,
            annotator,
            sink,
            cancel,
            options,
        }
    }

    /// Run the loop to exhaustion or cancellation.
    ///
    /// Per-frame annotation failures are logged and the raw frame passes
    /// through; stream and detection failures abort the run.
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        loop {
            if self.cancel.is_cancelled() || self.sink.cancel_requested() {
                log::info!("cancellation requested, stopping after {} frames", summary.frames);
                summary.cancelled = true;
                break;
            }

            let frame = match self.source.next_frame() {
                Ok(frame) => frame,
                Err(Error::EndOfStream) => {
                    log::info!("end of stream after {} frames", summary.frames);
                    break;
                }
                Err(e) => return Err(e),
            };

            if summary.frames == 0 {
                self.save_snapshot(&frame)?;
            }

            let batch = self.detector.detect(&frame)?;
            log::debug!("frame {}: {} detections", summary.frames, batch.len());

            let image = frame.into_image();
            let mut annotated = image.clone();
            let mut annotation_failed = false;

            for (idx, filtered) in self.zones.trigger_all(&batch) {
                let ctx = &self.zones.contexts()[idx];
                if let Err(e) = self.annotator.annotate(&mut annotated, ctx, &filtered) {
                    log::warn!(
                        "annotation failed on frame {} (zone {}): {}; passing raw frame through",
                        summary.frames,
                        idx,
                        e
                    );
                    annotation_failed = true;
                    break;
                }
            }

            let mut output = if annotation_failed { image } else { annotated };
            if let Some((w, h)) = self.options.output_size {
                if output.dimensions() != (w, h) {
                    output = image::imageops::resize(
                        &output,
                        w,
                        h,
                        image::imageops::FilterType::Triangle,
                    );
                }
            }

            self.sink.write(&output)?;
            summary.frames += 1;
        }

        Ok(summary)
    }

    /// Persist the first frame to disk, a one-time aid for authoring zone
    /// polygons against real footage.
    fn save_snapshot(&self, frame: &crate::frame::Frame) -> Result<()> {
        let Some(path) = &self.options.snapshot_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::stream(format!(
                        "failed to create snapshot directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        frame
            .to_image()
            .save(path)
            .map_err(|e| Error::stream(format!("failed to save snapshot {}: {}", path.display(), e)))?;
        log::info!(
            "saved first frame to {}; use it to author zone polygons (e.g. https://polygonzone.roboflow.com/)",
            path.display()
        );
        Ok(())
    }
}
