use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::detect::DetectionBatch;
use crate::error::{Error, Result};
use crate::zone::ZoneContext;

/// Rendering interface the pipeline drives.
///
/// Implementations visually mark the given detections and the zone boundary
/// on the frame image using the zone's style. A failure is per-frame and
/// recoverable; the driver logs it and passes the raw frame through.
pub trait FrameAnnotator {
    fn annotate(
        &self,
        image: &mut RgbImage,
        ctx: &ZoneContext,
        detections: &DetectionBatch,
    ) -> Result<()>;
}

/// Default annotator: hollow boxes, zone outline, optional text labels.
///
/// Label text (`"{label} {confidence:.2}"` above each box, plus the zone's
/// trigger count at the polygon centroid) is drawn only when a font was
/// loaded; without one the annotator still draws geometry.
pub struct Annotator {
    font: Option<FontVec>,
}

impl Annotator {
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Load a TTF/OTF font for label rendering.
    pub fn with_font_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            Error::configuration(format!("failed to read font {}: {}", path.display(), e))
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| {
            Error::configuration(format!("invalid font file {}: {}", path.display(), e))
        })?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn draw_zone_outline(&self, image: &mut RgbImage, ctx: &ZoneContext) {
        let color = Rgb(ctx.style.color);
        let vertices = ctx.zone.polygon().vertices();
        let n = vertices.len();
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            // Thickness by parallel offsets; draw_line_segment is 1px.
            for t in 0..ctx.style.thickness.max(1) as i32 {
                let off = t as f32 - (ctx.style.thickness as f32 - 1.0) / 2.0;
                draw_line_segment_mut(image, (a.x + off, a.y), (b.x + off, b.y), color);
                draw_line_segment_mut(image, (a.x, a.y + off), (b.x, b.y + off), color);
            }
        }
    }

    fn draw_boxes(&self, image: &mut RgbImage, ctx: &ZoneContext, detections: &DetectionBatch) {
        let color = Rgb(ctx.style.color);
        let (img_w, img_h) = image.dimensions();
        for det in detections.iter() {
            let x = det.x_min.max(0.0) as i32;
            let y = det.y_min.max(0.0) as i32;
            let w = ((det.x_max - det.x_min).max(1.0) as u32).min(img_w);
            let h = ((det.y_max - det.y_min).max(1.0) as u32).min(img_h);
            for t in 0..ctx.style.thickness.max(1) as i32 {
                if w <= 2 * t as u32 || h <= 2 * t as u32 {
                    break;
                }
                let rect = Rect::at(x + t, y + t).of_size(w - 2 * t as u32, h - 2 * t as u32);
                draw_hollow_rect_mut(image, rect, color);
            }
        }
    }

    fn draw_labels(&self, image: &mut RgbImage, ctx: &ZoneContext, detections: &DetectionBatch) {
        let Some(font) = &self.font else {
            return;
        };
        let color = Rgb(ctx.style.color);
        let scale = PxScale::from(ctx.style.text_scale);

        for det in detections.iter() {
            let text = format!("{} {:.2}", det.label, det.confidence);
            let x = det.x_min.max(0.0) as i32;
            let y = (det.y_min - ctx.style.text_scale).max(0.0) as i32;
            draw_text_mut(image, color, x, y, scale, font, &text);
        }

        // Zone trigger count at the polygon centroid, like the upstream
        // zone annotator.
        let centroid = ctx.zone.polygon().centroid();
        let count = ctx.zone.current_count().to_string();
        draw_text_mut(
            image,
            color,
            centroid.x as i32,
            centroid.y as i32,
            scale,
            font,
            &count,
        );
    }
}

impl FrameAnnotator for Annotator {
    fn annotate(
        &self,
        image: &mut RgbImage,
        ctx: &ZoneContext,
        detections: &DetectionBatch,
    ) -> Result<()> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(Error::annotation("cannot annotate an empty image"));
        }
        self.draw_zone_outline(image, ctx);
        self.draw_boxes(image, ctx, detections);
        self.draw_labels(image, ctx, detections);
        Ok(())
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::Style;
    use crate::detect::Detection;
    use crate::geometry::Point;
    use crate::zone::Zone;

    fn context() -> ZoneContext {
        let mut zone = Zone::new(vec![
            Point::new(2.0, 2.0),
            Point::new(30.0, 2.0),
            Point::new(30.0, 30.0),
            Point::new(2.0, 30.0),
        ])
        .unwrap();
        // Refresh the diagnostic count so the annotator has something to show.
        zone.trigger(&DetectionBatch::empty());
        ZoneContext::new(zone, Style::default().with_thickness(1))
    }

    #[test]
    fn draws_outline_and_boxes_onto_frame() {
        let mut image = RgbImage::new(40, 40);
        let ctx = context();
        let batch = DetectionBatch::new(vec![Detection::new(10.0, 10.0, 20.0, 20.0, "car", 0.9)]);

        Annotator::new().annotate(&mut image, &ctx, &batch).unwrap();

        // Zone outline passes through (2, 16); box edge through (10, 15).
        assert_eq!(image.get_pixel(2, 16).0, ctx.style.color);
        assert_eq!(image.get_pixel(10, 15).0, ctx.style.color);
        // Interior stays untouched.
        assert_eq!(image.get_pixel(15, 15).0, [0, 0, 0]);
    }

    #[test]
    fn empty_image_is_an_annotation_error() {
        let mut image = RgbImage::new(0, 0);
        let err = Annotator::new()
            .annotate(&mut image, &context(), &DetectionBatch::empty())
            .unwrap_err();
        assert!(matches!(err, Error::Annotation(_)));
    }

    #[test]
    fn missing_font_file_is_a_configuration_error() {
        let err = Annotator::new()
            .with_font_file("/nonexistent/font.ttf")
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
