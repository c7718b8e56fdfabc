//! Frame annotation: zone outlines, detection boxes, labels, counts.

mod annotator;
mod style;

pub use annotator::{Annotator, FrameAnnotator};
pub use style::{ColorPalette, Style};
