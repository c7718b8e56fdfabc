/// Boolean vector flagging which detections in a batch fall inside a zone.
///
/// Derived per frame, one entry per detection in batch order. Never cached
/// across frames.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerMask {
    bits: Vec<bool>,
}

impl TriggerMask {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Number of true entries.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}
