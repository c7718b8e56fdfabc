#![cfg(feature = "backend-tract")]

use std::path::Path;

use tract_onnx::prelude::*;

use crate::detect::backend::DetectorBackend;
use crate::detect::batch::{Detection, DetectionBatch};
use crate::error::{Error, Result};
use crate::frame::Frame;

/// IoU threshold for non-maximum suppression.
const IOU_THRESHOLD: f32 = 0.45;

/// Tract-based backend for ONNX object detection.
///
/// Loads a local YOLO-family model and decodes its `[1, 4 + C, N]` output
/// layout (box center/size rows followed by per-class score rows) into
/// labeled detections in source-frame pixel coordinates.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>>,
    input_size: u32,
    labels: Vec<String>,
    confidence_threshold: f32,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    ///
    /// `labels` maps model class indices to class names; `input_size` is the
    /// square model input resolution (e.g. 640).
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        input_size: u32,
        labels: Vec<String>,
        confidence_threshold: f32,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        if labels.is_empty() {
            return Err(Error::configuration(
                "tract backend requires a non-empty model label set",
            ));
        }
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|e| {
                Error::configuration(format!(
                    "failed to load ONNX model from {}: {}",
                    model_path.display(),
                    e
                ))
            })?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, input_size as usize, input_size as usize),
                ),
            )
            .map_err(|e| Error::configuration(format!("failed to set input fact: {}", e)))?
            .into_optimized()
            .map_err(|e| Error::configuration(format!("failed to optimize ONNX model: {}", e)))?
            .into_runnable()
            .map_err(|e| Error::configuration(format!("failed to build runnable model: {}", e)))?;

        Ok(Self {
            model,
            input_size,
            labels,
            confidence_threshold,
        })
    }

    /// Resize-to-square and convert to an NCHW float tensor in [0, 1].
    fn build_input(&self, frame: &Frame) -> Tensor {
        let size = self.input_size;
        let image = frame.to_image();
        let resized = image::imageops::resize(
            &image,
            size,
            size,
            image::imageops::FilterType::Triangle,
        );
        let raw = resized.as_raw();

        let input = tract_ndarray::Array4::from_shape_fn(
            (1, 3, size as usize, size as usize),
            |(_, channel, y, x)| {
                let idx = (y * size as usize + x) * 3 + channel;
                raw[idx] as f32 / 255.0
            },
        );
        input.into_tensor()
    }

    fn decode_output(&self, outputs: TVec<TValue>, frame: &Frame) -> Result<Vec<Detection>> {
        let output = outputs
            .first()
            .ok_or_else(|| Error::stream("model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| Error::stream(format!("model output tensor was not f32: {}", e)))?;
        let shape = view.shape();
        if shape.len() != 3 || shape[1] < 5 {
            return Err(Error::stream(format!(
                "unexpected model output shape {:?}",
                shape
            )));
        }
        let num_classes = shape[1] - 4;
        let num_proposals = shape[2];
        if num_classes > self.labels.len() {
            return Err(Error::configuration(format!(
                "model reports {} classes but only {} labels configured",
                num_classes,
                self.labels.len()
            )));
        }

        let scale_x = frame.width() as f32 / self.input_size as f32;
        let scale_y = frame.height() as f32 / self.input_size as f32;

        let mut candidates = Vec::new();
        for i in 0..num_proposals {
            // Rows: cx, cy, w, h, then one score row per class.
            let cx = view[[0, 0, i]];
            let cy = view[[0, 1, i]];
            let w = view[[0, 2, i]];
            let h = view[[0, 3, i]];

            let mut best_class = 0usize;
            let mut best_score = 0f32;
            for c in 0..num_classes {
                let s = view[[0, 4 + c, i]];
                if s > best_score {
                    best_score = s;
                    best_class = c;
                }
            }
            if best_score < self.confidence_threshold {
                continue;
            }

            let x_min = ((cx - w / 2.0) * scale_x).max(0.0);
            let y_min = ((cy - h / 2.0) * scale_y).max(0.0);
            let x_max = ((cx + w / 2.0) * scale_x).min(frame.width() as f32);
            let y_max = ((cy + h / 2.0) * scale_y).min(frame.height() as f32);

            candidates.push(Detection::new(
                x_min,
                y_min,
                x_max,
                y_max,
                self.labels[best_class].clone(),
                best_score,
            ));
        }

        Ok(nms(candidates, IOU_THRESHOLD))
    }
}

impl DetectorBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&mut self, frame: &Frame) -> Result<DetectionBatch> {
        let input = self.build_input(frame);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| Error::stream(format!("ONNX inference failed: {}", e)))?;
        let detections = self.decode_output(outputs, frame)?;
        Ok(DetectionBatch::new(detections))
    }
}

fn iou(a: &Detection, b: &Detection) -> f32 {
    let ix1 = a.x_min.max(b.x_min);
    let iy1 = a.y_min.max(b.y_min);
    let ix2 = a.x_max.min(b.x_max);
    let iy2 = a.y_max.min(b.y_max);
    let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a.x_max - a.x_min) * (a.y_max - a.y_min);
    let area_b = (b.x_max - b.x_min) * (b.y_max - b.y_min);
    inter / (area_a + area_b - inter)
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
fn nms(mut boxes: Vec<Detection>, iou_thresh: f32) -> Vec<Detection> {
    boxes.sort_unstable_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in boxes {
        if kept.iter().all(|k| iou(k, &candidate) <= iou_thresh) {
            kept.push(candidate);
        }
    }
    kept
}
