mod backend;
mod backends;
mod batch;
mod detector;

pub use backend::DetectorBackend;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use batch::{Detection, DetectionBatch};
pub use detector::{Detector, DetectorConfig};
