//! Configuration loading, saving and validation

use std::io::Write;
use tempfile::NamedTempFile;
use webcam_gaze::{
    config::{Config, GeometryConfig, PlaneAnchor, EXAMPLE_CONFIG},
    pipeline::{GazePipeline, GazeSession},
    Error,
};

#[test]
fn test_example_config_builds_a_pipeline() {
    let config = Config::from_yaml_str(EXAMPLE_CONFIG).unwrap();
    assert!(GazePipeline::new(&config).is_ok());
    assert!(GazeSession::new(&config).is_ok());
}

#[test]
fn test_config_file_round_trip() {
    let mut config = Config::with_geometry(GeometryConfig::macbook_pro_14());
    config.tracking.grace_period_frames = 9;
    config.filter.kind = "kalman".to_string();
    config.geometry.screen.anchor = PlaneAnchor::TopLeft;

    let file = NamedTempFile::new().unwrap();
    config.to_file(file.path()).unwrap();
    let loaded = Config::from_file(file.path()).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_minimal_config_uses_fallbacks() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r"
geometry:
  camera_offset: [0.0, 10.4, 0.0]
  eye_origin: [0.0, 0.0, 0.0]
  eye_direction: [0.0, 0.0, 1.0]
  screen:
    width: 30.0
    height: 20.0
"
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.tracking.grace_period_frames, 5);
    assert_eq!(config.filter.kind, "none");
    assert_eq!(config.geometry.screen.anchor, PlaneAnchor::Center);
    assert!((config.intersection.parallel_epsilon - 1e-6).abs() < f64::EPSILON);
    config.validate().unwrap();
}

#[test]
fn test_missing_geometry_is_rejected() {
    let result = Config::from_yaml_str("tracking:\n  grace_period_frames: 3\n");
    assert!(matches!(result, Err(Error::ConfigError(msg)) if msg.contains("geometry")));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_invalid_values_fail_loudly() {
    let base = Config::with_geometry(GeometryConfig::macbook_pro_14());

    let mut zero_width = base.clone();
    zero_width.geometry.screen.width = 0.0;
    assert!(matches!(zero_width.validate(), Err(Error::ConfigError(_))));

    let mut skewed = base.clone();
    skewed.geometry.screen.v_axis = skewed.geometry.screen.u_axis;
    assert!(matches!(GazePipeline::new(&skewed), Err(Error::ConfigError(_))));

    let mut no_direction = base.clone();
    no_direction.geometry.eye_direction = nalgebra::Vector3::zeros();
    assert!(no_direction.validate().is_err());

    let mut unknown_filter = base.clone();
    unknown_filter.filter.kind = "median".to_string();
    assert!(unknown_filter.validate().is_err());

    let mut zero_viewport = base;
    zero_viewport.viewport.width = 0;
    assert!(zero_viewport.validate().is_err());
}
