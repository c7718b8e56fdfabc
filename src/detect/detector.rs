use std::collections::HashSet;
use std::path::PathBuf;

use crate::detect::backend::DetectorBackend;
use crate::detect::batch::DetectionBatch;
use crate::error::{Error, Result};
use crate::frame::Frame;

/// Load-time detector configuration.
#[derive(Clone, Debug)]
pub struct DetectorConfig {
    /// Path to the model weights.
    pub model_path: PathBuf,
    /// Execution target, e.g. "cpu".
    pub device: String,
    /// Class-name allowlist. Must be non-empty; detections with labels
    /// outside this set never appear in a batch.
    pub classes: Vec<String>,
    /// Minimum confidence a backend should report.
    pub confidence_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::new(),
            device: "cpu".to_string(),
            classes: Vec::new(),
            confidence_threshold: 0.5,
        }
    }
}

/// Detector front: wraps a backend and enforces the class allowlist.
pub struct Detector {
    backend: Box<dyn DetectorBackend>,
    allowlist: HashSet<String>,
}

impl Detector {
    pub fn new(backend: Box<dyn DetectorBackend>, config: &DetectorConfig) -> Result<Self> {
        if config.classes.is_empty() {
            return Err(Error::configuration(
                "detection class allowlist must not be empty",
            ));
        }
        Ok(Self {
            backend,
            allowlist: config.classes.iter().cloned().collect(),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn warm_up(&mut self) -> Result<()> {
        self.backend.warm_up()
    }

    /// Run detection and drop anything outside the allowlist.
    pub fn detect(&mut self, frame: &Frame) -> Result<DetectionBatch> {
        let mut batch = self.backend.detect(frame)?;
        batch.retain_labels(|label| self.allowlist.contains(label));
        Ok(batch)
    }
}
