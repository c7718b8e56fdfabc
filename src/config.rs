//! Load-time configuration.
//!
//! One TOML file plus `ZONEVISION_*` environment overrides, validated once
//! at startup. There is no runtime reconfiguration; the pipeline receives an
//! explicit config struct at construction.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::annotate::{ColorPalette, Style};
use crate::detect::DetectorConfig;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::zone::{Zone, ZoneContext, ZoneSet};

const DEFAULT_DEVICE: &str = "cpu";
const DEFAULT_CLASSES: [&str; 4] = ["car", "motorcycle", "bus", "truck"];
const DEFAULT_OUTPUT_DIR: &str = "annotated";
const DEFAULT_OUTPUT_WIDTH: u32 = 1530;
const DEFAULT_OUTPUT_HEIGHT: u32 = 780;
const DEFAULT_SNAPSHOT_PATH: &str = "first_frame.jpg";
const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
const DEFAULT_MODEL_INPUT_SIZE: u32 = 640;
const DEFAULT_THICKNESS: u32 = 4;
const DEFAULT_TEXT_SCALE: f32 = 24.0;

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    video: Option<VideoConfigFile>,
    model: Option<ModelConfigFile>,
    annotate: Option<AnnotateConfigFile>,
    #[serde(default)]
    zones: Vec<ZoneConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct VideoConfigFile {
    input: Option<String>,
    output_dir: Option<PathBuf>,
    output_width: Option<u32>,
    output_height: Option<u32>,
    snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelConfigFile {
    path: Option<PathBuf>,
    device: Option<String>,
    classes: Option<Vec<String>>,
    confidence_threshold: Option<f32>,
    input_size: Option<u32>,
    labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct AnnotateConfigFile {
    font_path: Option<PathBuf>,
    thickness: Option<u32>,
    text_scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ZoneConfigFile {
    polygon: Vec<[f32; 2]>,
}

#[derive(Clone, Debug)]
pub struct ZoneVisionConfig {
    pub video: VideoSettings,
    pub model: ModelSettings,
    pub annotate: AnnotateSettings,
    /// One polygon per zone, in display order.
    pub polygons: Vec<Vec<Point>>,
}

#[derive(Clone, Debug)]
pub struct VideoSettings {
    pub input: String,
    pub output_dir: PathBuf,
    pub output_size: (u32, u32),
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ModelSettings {
    pub path: PathBuf,
    pub device: String,
    pub classes: Vec<String>,
    pub confidence_threshold: f32,
    pub input_size: u32,
    /// Model class-index → name mapping (for real backends).
    pub labels: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct AnnotateSettings {
    pub font_path: Option<PathBuf>,
    pub thickness: u32,
    pub text_scale: f32,
}

impl ZoneVisionConfig {
    /// Load from the path in `ZONEVISION_CONFIG` (defaults apply when
    /// unset), then apply environment overrides and validate.
    pub fn load() -> Result<Self> {
        let file_cfg = match std::env::var("ZONEVISION_CONFIG").ok().as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => ConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit file path, then env overrides and validation.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::from_file(read_config_file(path)?);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ConfigFile) -> Self {
        let video = file.video.unwrap_or_default();
        let model = file.model.unwrap_or_default();
        let annotate = file.annotate.unwrap_or_default();

        Self {
            video: VideoSettings {
                input: video.input.unwrap_or_default(),
                output_dir: video
                    .output_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
                output_size: (
                    video.output_width.unwrap_or(DEFAULT_OUTPUT_WIDTH),
                    video.output_height.unwrap_or(DEFAULT_OUTPUT_HEIGHT),
                ),
                snapshot_path: Some(
                    video
                        .snapshot_path
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
                ),
            },
            model: ModelSettings {
                path: model.path.unwrap_or_default(),
                device: model.device.unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
                classes: model.classes.unwrap_or_else(|| {
                    DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect()
                }),
                confidence_threshold: model
                    .confidence_threshold
                    .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
                input_size: model.input_size.unwrap_or(DEFAULT_MODEL_INPUT_SIZE),
                labels: model.labels.unwrap_or_default(),
            },
            annotate: AnnotateSettings {
                font_path: annotate.font_path,
                thickness: annotate.thickness.unwrap_or(DEFAULT_THICKNESS),
                text_scale: annotate.text_scale.unwrap_or(DEFAULT_TEXT_SCALE),
            },
            polygons: file
                .zones
                .into_iter()
                .map(|z| z.polygon.into_iter().map(Point::from).collect())
                .collect(),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(input) = std::env::var("ZONEVISION_INPUT") {
            if !input.trim().is_empty() {
                self.video.input = input;
            }
        }
        if let Ok(dir) = std::env::var("ZONEVISION_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.video.output_dir = PathBuf::from(dir);
            }
        }
        if let Ok(path) = std::env::var("ZONEVISION_MODEL_PATH") {
            if !path.trim().is_empty() {
                self.model.path = PathBuf::from(path);
            }
        }
        if let Ok(device) = std::env::var("ZONEVISION_DEVICE") {
            if !device.trim().is_empty() {
                self.model.device = device;
            }
        }
        if let Ok(classes) = std::env::var("ZONEVISION_CLASSES") {
            let parsed = split_csv(&classes);
            if !parsed.is_empty() {
                self.model.classes = parsed;
            }
        }
        if let Ok(threshold) = std::env::var("ZONEVISION_CONFIDENCE") {
            self.model.confidence_threshold = threshold.parse().map_err(|_| {
                Error::configuration("ZONEVISION_CONFIDENCE must be a number in [0, 1]")
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.video.input.trim().is_empty() {
            return Err(Error::configuration("video input path must be set"));
        }
        let (w, h) = self.video.output_size;
        if w == 0 || h == 0 {
            return Err(Error::configuration(format!(
                "output resolution {}x{} is invalid",
                w, h
            )));
        }
        if self.model.classes.is_empty() {
            return Err(Error::configuration(
                "detection class allowlist must not be empty",
            ));
        }
        if !(0.0..=1.0).contains(&self.model.confidence_threshold) {
            return Err(Error::configuration(format!(
                "confidence threshold {} outside [0, 1]",
                self.model.confidence_threshold
            )));
        }
        if self.polygons.is_empty() {
            return Err(Error::configuration("at least one zone must be configured"));
        }
        for (idx, polygon) in self.polygons.iter().enumerate() {
            if polygon.len() < 3 {
                return Err(Error::configuration(format!(
                    "zone {} polygon has {} vertices, need at least 3",
                    idx,
                    polygon.len()
                )));
            }
        }
        if self.annotate.thickness == 0 {
            return Err(Error::configuration("annotation thickness must be >= 1"));
        }
        Ok(())
    }

    /// Build the zone set, one context per configured polygon with a
    /// palette color by index.
    pub fn build_zone_set(&self) -> Result<ZoneSet> {
        let palette = ColorPalette::default();
        let contexts = self
            .polygons
            .iter()
            .enumerate()
            .map(|(idx, vertices)| {
                let zone = Zone::new(vertices.clone())?;
                let style = Style::for_index(&palette, idx)
                    .with_thickness(self.annotate.thickness)
                    .with_text_scale(self.annotate.text_scale);
                Ok(ZoneContext::new(zone, style))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ZoneSet::new(contexts))
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            model_path: self.model.path.clone(),
            device: self.model.device.clone(),
            classes: self.model.classes.clone(),
            confidence_threshold: self.model.confidence_threshold,
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!("failed to read config file {}: {}", path.display(), e))
    })?;
    toml::from_str(&raw).map_err(|e| {
        Error::configuration(format!("invalid config file {}: {}", path.display(), e))
    })
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
