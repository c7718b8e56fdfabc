use crate::annotate::Style;
use crate::detect::DetectionBatch;
use crate::zone::Zone;

/// One zone plus everything indexed alongside it: its annotation style and
/// its diagnostic counter (carried by the zone itself). Keeping these in a
/// single entity removes the index-alignment hazard of parallel lists.
#[derive(Clone, Debug)]
pub struct ZoneContext {
    pub zone: Zone,
    pub style: Style,
}

impl ZoneContext {
    pub fn new(zone: Zone, style: Style) -> Self {
        Self { zone, style }
    }
}

/// The trigger engine: all configured zones, evaluated in order against each
/// frame's detection batch.
#[derive(Clone, Debug, Default)]
pub struct ZoneSet {
    contexts: Vec<ZoneContext>,
}

impl ZoneSet {
    pub fn new(contexts: Vec<ZoneContext>) -> Self {
        Self { contexts }
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn contexts(&self) -> &[ZoneContext] {
        &self.contexts
    }

    /// Trigger every zone against the batch. Returns, per zone in
    /// configuration order, the filtered subset of detections whose mask bit
    /// is true. Deterministic; no detection is mutated, and a detection
    /// inside several overlapping zones appears in each of their subsets.
    pub fn trigger_all(&mut self, batch: &DetectionBatch) -> Vec<(usize, DetectionBatch)> {
        self.contexts
            .iter_mut()
            .enumerate()
            .map(|(idx, ctx)| {
                let mask = ctx.zone.trigger(batch);
                (idx, batch.filter_by_mask(&mask))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::ColorPalette;
    use crate::detect::Detection;
    use crate::geometry::Point;

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Zone {
        Zone::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
        .unwrap()
    }

    fn set_of(zones: Vec<Zone>) -> ZoneSet {
        let palette = ColorPalette::default();
        ZoneSet::new(
            zones
                .into_iter()
                .enumerate()
                .map(|(idx, zone)| ZoneContext::new(zone, Style::for_index(&palette, idx)))
                .collect(),
        )
    }

    fn det_at(x: f32, y: f32, label: &str) -> Detection {
        Detection::new(x - 1.0, y - 2.0, x + 1.0, y, label, 0.9)
    }

    #[test]
    fn overlapping_zones_both_receive_shared_detection() {
        // Two squares overlapping in [5,10]x[0,10].
        let mut set = set_of(vec![
            square(0.0, 0.0, 10.0, 10.0),
            square(5.0, 0.0, 15.0, 10.0),
        ]);
        let batch = DetectionBatch::new(vec![det_at(7.0, 5.0, "car")]);

        let results = set.trigger_all(&batch);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert_eq!(results[0].1.len(), 1);
        assert_eq!(results[1].0, 1);
        assert_eq!(results[1].1.len(), 1);
    }

    #[test]
    fn disjoint_zones_split_the_batch() {
        let mut set = set_of(vec![
            square(0.0, 0.0, 10.0, 10.0),
            square(20.0, 0.0, 30.0, 10.0),
        ]);
        let batch = DetectionBatch::new(vec![
            det_at(5.0, 5.0, "car"),
            det_at(25.0, 5.0, "bus"),
            det_at(50.0, 5.0, "truck"),
        ]);

        let results = set.trigger_all(&batch);
        assert_eq!(results[0].1.as_slice()[0].label, "car");
        assert_eq!(results[1].1.as_slice()[0].label, "bus");
        assert_eq!(results[0].1.len(), 1);
        assert_eq!(results[1].1.len(), 1);
    }

    #[test]
    fn source_batch_is_never_mutated() {
        let mut set = set_of(vec![square(0.0, 0.0, 10.0, 10.0)]);
        let batch = DetectionBatch::new(vec![det_at(5.0, 5.0, "car")]);
        let before = batch.clone();

        set.trigger_all(&batch);
        assert_eq!(batch, before);
    }
}
