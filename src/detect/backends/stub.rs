use crate::detect::backend::DetectorBackend;
use crate::detect::batch::{Detection, DetectionBatch};
use crate::error::Result;
use crate::frame::Frame;

/// Scripted backend for tests and the `stub://` source.
///
/// Plays back a fixed sequence of detection batches, one per frame. Once the
/// script is exhausted (or when none is set) every frame yields an empty
/// batch.
#[derive(Default)]
pub struct StubBackend {
    script: Vec<Vec<Detection>>,
    cursor: usize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a per-frame detection script.
    pub fn with_script(mut self, script: Vec<Vec<Detection>>) -> Self {
        self.script = script;
        self.cursor = 0;
        self
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<DetectionBatch> {
        let batch = match self.script.get(self.cursor) {
            Some(detections) => DetectionBatch::new(detections.clone()),
            None => DetectionBatch::empty(),
        };
        self.cursor += 1;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_script_then_empty_batches() {
        let mut backend = StubBackend::new().with_script(vec![
            vec![Detection::new(0.0, 0.0, 1.0, 1.0, "car", 0.9)],
            vec![],
        ]);
        let frame = Frame::new(vec![0u8; 2 * 2 * 3], 2, 2).unwrap();

        assert_eq!(backend.detect(&frame).unwrap().len(), 1);
        assert_eq!(backend.detect(&frame).unwrap().len(), 0);
        // Past the end of the script.
        assert_eq!(backend.detect(&frame).unwrap().len(), 0);
    }
}
