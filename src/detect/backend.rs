use crate::detect::batch::DetectionBatch;
use crate::error::Result;
use crate::frame::Frame;

/// Detector backend trait.
///
/// A backend is an opaque function from a frame to a detection batch.
/// Backends report raw model output; the class allowlist is enforced by
/// [`Detector`](crate::detect::Detector), not by backends, so a
/// misconfigured backend cannot leak out-of-allowlist labels downstream.
pub trait DetectorBackend: Send {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    fn detect(&mut self, frame: &Frame) -> Result<DetectionBatch>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
