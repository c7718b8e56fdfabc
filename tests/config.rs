use std::sync::Mutex;

use tempfile::NamedTempFile;

use zonevision::config::ZoneVisionConfig;
use zonevision::error::Error;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "ZONEVISION_CONFIG",
        "ZONEVISION_INPUT",
        "ZONEVISION_OUTPUT_DIR",
        "ZONEVISION_MODEL_PATH",
        "ZONEVISION_DEVICE",
        "ZONEVISION_CLASSES",
        "ZONEVISION_CONFIDENCE",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(toml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, toml.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        r#"
        [video]
        input = "videos/intersection.mp4"
        output_dir = "out"
        output_width = 1530
        output_height = 780
        snapshot_path = "zones/first_frame.jpg"

        [model]
        path = "weights/model.onnx"
        device = "cpu"
        classes = ["car", "bus"]
        confidence_threshold = 0.4

        [annotate]
        thickness = 2
        text_scale = 18.0

        [[zones]]
        polygon = [[1, 333], [499, 339], [482, 818], [-2, 804]]

        [[zones]]
        polygon = [[613, 965], [604, 889], [556, 834], [1145, 843]]
        "#,
    );

    std::env::set_var("ZONEVISION_CONFIG", file.path());
    std::env::set_var("ZONEVISION_DEVICE", "cpu:1");
    std::env::set_var("ZONEVISION_CLASSES", "car, truck");

    let cfg = ZoneVisionConfig::load().expect("load config");

    assert_eq!(cfg.video.input, "videos/intersection.mp4");
    assert_eq!(cfg.video.output_size, (1530, 780));
    assert_eq!(
        cfg.video.snapshot_path.as_deref().unwrap().to_str(),
        Some("zones/first_frame.jpg")
    );
    assert_eq!(cfg.model.path.to_str(), Some("weights/model.onnx"));
    // Env overrides win over the file.
    assert_eq!(cfg.model.device, "cpu:1");
    assert_eq!(cfg.model.classes, vec!["car", "truck"]);
    assert_eq!(cfg.model.confidence_threshold, 0.4);
    assert_eq!(cfg.annotate.thickness, 2);
    assert_eq!(cfg.polygons.len(), 2);
    assert_eq!(cfg.polygons[0].len(), 4);
    assert_eq!(cfg.polygons[0][0].x, 1.0);
    assert_eq!(cfg.polygons[0][0].y, 333.0);

    let zones = cfg.build_zone_set().expect("zone set");
    assert_eq!(zones.len(), 2);

    clear_env();
}

#[test]
fn degenerate_zone_polygon_is_rejected_at_load() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        r#"
        [video]
        input = "stub://3"

        [[zones]]
        polygon = [[0, 0], [10, 0]]
        "#,
    );

    let err = ZoneVisionConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    clear_env();
}

#[test]
fn missing_zones_are_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        r#"
        [video]
        input = "stub://3"
        "#,
    );

    let err = ZoneVisionConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    clear_env();
}

#[test]
fn defaults_mirror_the_reference_setup() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        r#"
        [video]
        input = "stub://3"

        [[zones]]
        polygon = [[0, 0], [10, 0], [10, 10]]
        "#,
    );

    let cfg = ZoneVisionConfig::load_from(file.path()).expect("load config");
    assert_eq!(cfg.model.classes, vec!["car", "motorcycle", "bus", "truck"]);
    assert_eq!(cfg.video.output_size, (1530, 780));
    assert_eq!(
        cfg.video.snapshot_path.as_deref().unwrap().to_str(),
        Some("first_frame.jpg")
    );

    clear_env();
}
