//! ZoneVision
//!
//! Detect objects within custom polygonal zones in a video stream.
//!
//! # Architecture
//!
//! Data flows one frame at a time, single-threaded:
//!
//! frame → detections → (per zone) filtered subset → annotated frame → sink
//!
//! - `geometry`: polygons and the point-in-polygon test
//! - `detect`: detection batches, backend trait, allowlist enforcement
//! - `zone`: trigger zones and the per-frame trigger engine
//! - `annotate`: drawing boxes, labels, and zone outlines
//! - `source` / `sink`: frame I/O at the pipeline boundary
//! - `pipeline`: the sequential driver loop
//! - `clip`: independent ffmpeg-based clip trimming
//! - `config`: load-time configuration
//!
//! Conventions fixed by this crate (the upstream libraries leave them
//! ambiguous): a detection's zone-membership reference point is the
//! bottom-center of its bounding box, and points exactly on a polygon edge
//! are inside.

pub mod annotate;
pub mod clip;
pub mod config;
pub mod detect;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod zone;

pub use annotate::{Annotator, ColorPalette, FrameAnnotator, Style};
pub use config::ZoneVisionConfig;
pub use detect::{Detection, DetectionBatch, Detector, DetectorBackend, DetectorConfig, StubBackend};
#[cfg(feature = "backend-tract")]
pub use detect::TractBackend;
pub use error::{Error, Result};
pub use frame::Frame;
pub use geometry::{Point, Polygon};
pub use pipeline::{CancelToken, Pipeline, PipelineOptions, RunSummary};
pub use sink::{FrameSink, ImageDirSink, NullSink};
pub use source::{SourceConfig, VideoSource};
pub use zone::{TriggerMask, Zone, ZoneContext, ZoneSet};
