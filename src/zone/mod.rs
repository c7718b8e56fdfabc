//! Polygonal trigger zones.
//!
//! A `Zone` decides which detections in a batch have their reference point
//! inside its polygon. `ZoneSet` runs that test across all configured zones
//! for one frame and yields each zone's filtered subset. Zones may overlap;
//! one detection can trigger any number of zones.

mod mask;
mod set;

pub use mask::TriggerMask;
pub use set::{ZoneContext, ZoneSet};

use crate::detect::DetectionBatch;
use crate::error::Result;
use crate::geometry::{Point, Polygon};

/// A fixed polygonal region of interest within a video frame.
///
/// Geometry is immutable after construction; the only mutable state is a
/// diagnostic count of currently-triggered detections, refreshed by each
/// `trigger` call and read back for display.
#[derive(Clone, Debug)]
pub struct Zone {
    polygon: Polygon,
    current_count: usize,
}

impl Zone {
    /// Build a zone from polygon vertices. Fails with a configuration error
    /// when fewer than 3 vertices are given; `trigger` itself cannot fail.
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        Ok(Self {
            polygon: Polygon::new(vertices)?,
            current_count: 0,
        })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Number of detections inside this zone on the most recent frame.
    /// Diagnostic only; not required for correctness.
    pub fn current_count(&self) -> usize {
        self.current_count
    }

    /// Membership test for a single point. Boundary counts as inside.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.polygon.contains(Point::new(x, y))
    }

    /// Compute the trigger mask for a batch: one bit per detection, true
    /// when the detection's reference point (bottom-center of its box) lies
    /// inside the polygon. Order-preserving; detections are not mutated.
    pub fn trigger(&mut self, batch: &DetectionBatch) -> TriggerMask {
        let bits: Vec<bool> = batch
            .iter()
            .map(|det| self.polygon.contains(det.reference_point()))
            .collect();
        self.current_count = bits.iter().filter(|b| **b).count();
        TriggerMask::new(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Detection;
    use crate::error::Error;

    fn unit_square_zone() -> Zone {
        Zone::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap()
    }

    /// Box whose bottom-center lands on (x, y).
    fn det_at(x: f32, y: f32, label: &str) -> Detection {
        Detection::new(x - 1.0, y - 2.0, x + 1.0, y, label, 0.9)
    }

    #[test]
    fn two_vertex_zone_fails_at_construction() {
        let err = Zone::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn trigger_mask_matches_batch_length() {
        let mut zone = unit_square_zone();
        assert_eq!(zone.trigger(&DetectionBatch::empty()).len(), 0);

        let batch = DetectionBatch::new(vec![
            det_at(5.0, 5.0, "car"),
            det_at(15.0, 15.0, "bus"),
            det_at(2.0, 2.0, "truck"),
        ]);
        assert_eq!(zone.trigger(&batch).len(), 3);
    }

    #[test]
    fn unit_square_scenario() {
        let mut zone = unit_square_zone();
        let batch = DetectionBatch::new(vec![det_at(5.0, 5.0, "car"), det_at(15.0, 15.0, "bus")]);

        let mask = zone.trigger(&batch);
        assert_eq!(mask.as_slice(), &[true, false]);

        let filtered = batch.filter_by_mask(&mask);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.as_slice()[0].label, "car");
    }

    #[test]
    fn trigger_is_idempotent() {
        let mut zone = unit_square_zone();
        let batch = DetectionBatch::new(vec![det_at(5.0, 5.0, "car"), det_at(15.0, 15.0, "bus")]);

        let first = zone.trigger(&batch);
        let second = zone.trigger(&batch);
        assert_eq!(first.as_slice(), second.as_slice());
        assert_eq!(zone.current_count(), 1);
    }

    #[test]
    fn count_reflects_latest_frame_only() {
        let mut zone = unit_square_zone();
        zone.trigger(&DetectionBatch::new(vec![
            det_at(1.0, 1.0, "car"),
            det_at(2.0, 2.0, "car"),
        ]));
        assert_eq!(zone.current_count(), 2);

        zone.trigger(&DetectionBatch::empty());
        assert_eq!(zone.current_count(), 0);
    }
}
