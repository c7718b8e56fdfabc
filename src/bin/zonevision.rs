//! zonevision - zone-triggered detection/annotation pipeline
//!
//! 1. Loads configuration (TOML file + ZONEVISION_* env overrides)
//! 2. Opens the frame source and the detector backend
//! 3. Builds one zone context per configured polygon
//! 4. Runs the sequential frame loop until end of stream or Ctrl-C

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use zonevision::{
    Annotator, CancelToken, Detector, DetectorBackend, FrameSink, ImageDirSink, Pipeline,
    PipelineOptions, SourceConfig, VideoSource, ZoneVisionConfig,
};

#[derive(Debug, Parser)]
#[command(name = "zonevision", about = "Detect objects within polygonal zones in a video")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, env = "ZONEVISION_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => ZoneVisionConfig::load_from(path)?,
        None => ZoneVisionConfig::load()?,
    };

    log::info!(
        "input={} zones={} classes={:?} device={}",
        cfg.video.input,
        cfg.polygons.len(),
        cfg.model.classes,
        cfg.model.device
    );

    let source = VideoSource::open(&SourceConfig {
        input: cfg.video.input.clone(),
    })?;

    let backend = build_backend(&cfg)?;
    log::info!("detector backend: {}", backend.name());
    let mut detector = Detector::new(backend, &cfg.detector_config())?;
    detector.warm_up()?;

    let zones = cfg.build_zone_set()?;

    let mut annotator = Annotator::new();
    if let Some(font_path) = &cfg.annotate.font_path {
        annotator = annotator.with_font_file(font_path)?;
    } else {
        log::warn!("no font configured; labels and zone counts will not be drawn");
    }

    let sink: Box<dyn FrameSink> = Box::new(ImageDirSink::new(&cfg.video.output_dir)?);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        log::info!("interrupt received, finishing current frame");
        handler_token.cancel();
    })
    .map_err(|e| anyhow!("failed to install interrupt handler: {}", e))?;

    let options = PipelineOptions {
        output_size: Some(cfg.video.output_size),
        snapshot_path: cfg.video.snapshot_path.clone(),
    };

    let mut pipeline = Pipeline::new(
        source,
        detector,
        zones,
        Box::new(annotator),
        sink,
        cancel,
        options,
    );

    let summary = pipeline.run()?;
    log::info!(
        "done: {} frames annotated{}",
        summary.frames,
        if summary.cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}

#[cfg(feature = "backend-tract")]
fn build_backend(cfg: &ZoneVisionConfig) -> Result<Box<dyn DetectorBackend>> {
    if cfg.model.device != "cpu" {
        return Err(anyhow!(
            "the tract backend only supports device 'cpu', got '{}'",
            cfg.model.device
        ));
    }
    if cfg.model.labels.is_empty() {
        return Err(anyhow!(
            "model.labels must list the model's class names for the tract backend"
        ));
    }
    let backend = zonevision::TractBackend::new(
        &cfg.model.path,
        cfg.model.input_size,
        cfg.model.labels.clone(),
        cfg.model.confidence_threshold,
    )?;
    Ok(Box::new(backend))
}

#[cfg(not(feature = "backend-tract"))]
fn build_backend(_cfg: &ZoneVisionConfig) -> Result<Box<dyn DetectorBackend>> {
    log::warn!("built without backend-tract; using the stub detector (no real detections)");
    Ok(Box::new(zonevision::StubBackend::new()))
}
