//! Error taxonomy for the zone pipeline.
//!
//! Four kinds, four policies:
//! - `Configuration` is fatal at startup.
//! - `Stream` aborts a run with a diagnostic.
//! - `EndOfStream` is normal termination, never an error in logs.
//! - `Annotation` is per-frame and recoverable (the raw frame passes through).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad polygon, missing model, invalid device, empty allowlist, etc.
    /// Raised at construction/load time, never per-frame.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Frame source unreadable or corrupt; external tool failure.
    #[error("stream error: {0}")]
    Stream(String),

    /// The frame source is exhausted. Normal loop termination.
    #[error("end of stream")]
    EndOfStream,

    /// Rendering failed for one frame. The driver logs and passes the
    /// unannotated frame through.
    #[error("annotation error: {0}")]
    Annotation(String),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream(msg.into())
    }

    pub fn annotation(msg: impl Into<String>) -> Self {
        Self::Annotation(msg.into())
    }

    /// True for the normal termination condition.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}
