use crate::geometry::Point;
use crate::zone::TriggerMask;

/// One observed object instance in a frame.
///
/// Bounding box coordinates are pixels in the source frame. Detections are
/// owned by their batch and never persisted across frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(
        x_min: f32,
        y_min: f32,
        x_max: f32,
        y_max: f32,
        label: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
            label: label.into(),
            confidence,
        }
    }

    /// The single point tested for zone membership.
    ///
    /// Convention: bottom-center of the bounding box,
    /// `((x_min + x_max) / 2, y_max)`. For ground-level objects this is the
    /// point touching the ground plane, which is what zone polygons are
    /// drawn around.
    pub fn reference_point(&self) -> Point {
        Point::new((self.x_min + self.x_max) / 2.0, self.y_max)
    }
}

/// Ordered collection of detections for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionBatch {
    detections: Vec<Detection>,
}

impl DetectionBatch {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    pub fn as_slice(&self) -> &[Detection] {
        &self.detections
    }

    /// Keep only detections whose mask bit is true. Order and field values
    /// of survivors are preserved.
    ///
    /// Panics when the mask length differs from the batch length; masks are
    /// only valid for the batch they were derived from.
    pub fn filter_by_mask(&self, mask: &TriggerMask) -> DetectionBatch {
        assert_eq!(
            mask.len(),
            self.len(),
            "trigger mask length must equal batch length"
        );
        let detections = self
            .detections
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| *keep)
            .map(|(d, _)| d.clone())
            .collect();
        DetectionBatch { detections }
    }

    /// Keep only detections whose label passes `allow`.
    pub fn retain_labels<F: Fn(&str) -> bool>(&mut self, allow: F) {
        self.detections.retain(|d| allow(&d.label));
    }
}

impl FromIterator<Detection> for DetectionBatch {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self {
            detections: iter.into_iter().collect(),
        }
    }
}
