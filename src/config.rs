//! Configuration management for the gaze pipeline

use crate::{
    constants::{
        DEFAULT_BEHIND_EPSILON, DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_GRACE_PERIOD_FRAMES,
        DEFAULT_KALMAN_MEASUREMENT_NOISE, DEFAULT_KALMAN_PROCESS_NOISE, DEFAULT_MOVING_AVERAGE_WINDOW,
        DEFAULT_PARALLEL_EPSILON, MBP14_CAMERA_ABOVE_CENTER_CM, MBP14_SCREEN_HEIGHT_CM, MBP14_SCREEN_WIDTH_CM,
        MIN_VECTOR_NORM,
    },
    screen::{ScreenPlane, Viewport},
    Error, Result,
};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Physical layout; must always be supplied
    pub geometry: GeometryConfig,

    /// Ray/plane intersection tolerances
    #[serde(default)]
    pub intersection: IntersectionConfig,

    /// Hold-over behaviour
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Gaze point smoothing
    #[serde(default)]
    pub filter: FilterConfig,

    /// Pixel viewport of the consumer
    #[serde(default)]
    pub viewport: Viewport,
}

/// Physical layout of camera, screen and eye ray.
///
/// The world frame is anchored to the screen. Head poses arrive relative to
/// the camera, which sits at `camera_offset` with axes parallel to the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Camera position in world coordinates
    pub camera_offset: Vector3<f64>,

    /// Eye ray origin in head-local coordinates
    pub eye_origin: Vector3<f64>,

    /// Eye ray direction in head-local coordinates (need not be unit length)
    pub eye_direction: Vector3<f64>,

    /// Screen surface
    pub screen: ScreenConfig,
}

/// Screen placement and size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Physical width along `u_axis`
    pub width: f64,

    /// Physical height along `v_axis`
    pub height: f64,

    /// Plane origin in world coordinates
    #[serde(default = "default_center")]
    pub center: Vector3<f64>,

    /// Direction of increasing screen x (left to right)
    #[serde(default = "default_u_axis")]
    pub u_axis: Vector3<f64>,

    /// Direction of increasing screen y (top to bottom)
    #[serde(default = "default_v_axis")]
    pub v_axis: Vector3<f64>,

    /// Which screen point `center` refers to
    #[serde(default)]
    pub anchor: PlaneAnchor,
}

/// Where the plane origin sits on the screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneAnchor {
    /// Origin is the screen center, normalized (0.5, 0.5)
    #[default]
    Center,
    /// Origin is the top-left corner, normalized (0, 0)
    TopLeft,
}

impl PlaneAnchor {
    /// Normalized coordinate of the plane origin on each axis
    pub const fn offset(self) -> f64 {
        match self {
            Self::Center => 0.5,
            Self::TopLeft => 0.0,
        }
    }
}

/// Intersection tolerances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionConfig {
    /// Minimum `|dot(direction, normal)|` for a ray to count as crossing the plane
    pub parallel_epsilon: f64,

    /// Slack for the "behind the eye" check
    pub behind_epsilon: f64,
}

/// Tracking hysteresis configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Consecutive failed frames bridged with the last valid point
    pub grace_period_frames: u32,
}

/// Filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter type (none, exponential, moving_average, kalman)
    pub kind: String,

    /// Exponential filter alpha value
    pub exponential_alpha: f64,

    /// Moving average window size
    pub moving_average_window: usize,

    /// Kalman process noise
    pub kalman_process_noise: f64,

    /// Kalman measurement noise
    pub kalman_measurement_noise: f64,
}

fn default_center() -> Vector3<f64> {
    Vector3::zeros()
}

fn default_u_axis() -> Vector3<f64> {
    Vector3::x()
}

fn default_v_axis() -> Vector3<f64> {
    -Vector3::y()
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            parallel_epsilon: DEFAULT_PARALLEL_EPSILON,
            behind_epsilon: DEFAULT_BEHIND_EPSILON,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            grace_period_frames: DEFAULT_GRACE_PERIOD_FRAMES,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: "none".to_string(),
            exponential_alpha: DEFAULT_EXPONENTIAL_ALPHA,
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
            kalman_process_noise: DEFAULT_KALMAN_PROCESS_NOISE,
            kalman_measurement_noise: DEFAULT_KALMAN_MEASUREMENT_NOISE,
        }
    }
}

impl ScreenConfig {
    /// Screen centered on the world origin, x to the right and y down
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            center: default_center(),
            u_axis: default_u_axis(),
            v_axis: default_v_axis(),
            anchor: PlaneAnchor::Center,
        }
    }
}

impl GeometryConfig {
    /// MacBook Pro 14" with the built-in camera, in centimeters.
    ///
    /// The eye origin approximates the point between the eyes of MediaPipe's
    /// canonical face model; the eye ray points out of the face.
    #[must_use]
    pub fn macbook_pro_14() -> Self {
        Self {
            camera_offset: Vector3::new(0.0, MBP14_CAMERA_ABOVE_CENTER_CM, 0.0),
            eye_origin: Vector3::new(0.0, 2.5, 3.0),
            eye_direction: Vector3::z(),
            screen: ScreenConfig::centered(MBP14_SCREEN_WIDTH_CM, MBP14_SCREEN_HEIGHT_CM),
        }
    }

    /// Look up a named layout preset
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "macbook-pro-14" | "macbook_pro_14" | "mbp14" => Some(Self::macbook_pro_14()),
            _ => None,
        }
    }

    /// Validate the layout
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for non-finite or zero-length vectors, a
    /// non-positive screen size, or non-orthogonal screen axes.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("camera_offset", &self.camera_offset),
            ("eye_origin", &self.eye_origin),
            ("eye_direction", &self.eye_direction),
        ] {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(Error::ConfigError(format!("{name} must be finite")));
            }
        }
        if self.eye_direction.norm() <= MIN_VECTOR_NORM {
            return Err(Error::ConfigError("eye_direction must be non-zero".to_string()));
        }

        ScreenPlane::from_config(&self.screen).map(|_| ())
    }
}

impl Config {
    /// Configuration with the given geometry and fallbacks everywhere else
    #[must_use]
    pub fn with_geometry(geometry: GeometryConfig) -> Self {
        Self {
            geometry,
            intersection: IntersectionConfig::default(),
            tracking: TrackingConfig::default(),
            filter: FilterConfig::default(),
            viewport: Viewport::default(),
        }
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::info!("Loaded configuration from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the text is not a valid configuration.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;

        let eps = &self.intersection;
        if !(eps.parallel_epsilon.is_finite() && eps.parallel_epsilon > 0.0) {
            return Err(Error::ConfigError(
                "parallel_epsilon must be finite and greater than 0".to_string(),
            ));
        }
        if !(eps.behind_epsilon.is_finite() && eps.behind_epsilon >= 0.0) {
            return Err(Error::ConfigError(
                "behind_epsilon must be finite and non-negative".to_string(),
            ));
        }

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::ConfigError("Viewport must be at least 1x1 pixels".to_string()));
        }

        crate::filters::create_filter(&self.filter)
            .map(|_| ())
            .map_err(|e| Error::ConfigError(e.to_string()))
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Webcam gaze estimation configuration
# Lengths use the landmark source's unit (centimeters for MediaPipe).

# Keys marked "default" may be omitted; everything else is required.

# Physical layout (required). World frame: screen plane at z = 0, y up, user at negative z.
geometry:
  # Camera position relative to the screen center
  camera_offset: [0.0, 10.4, 0.0]
  # Eye ray in head-local coordinates
  eye_origin: [0.0, 2.5, 3.0]
  eye_direction: [0.0, 0.0, 1.0]
  screen:
    width: 30.25
    height: 19.65
    # Plane origin, default [0, 0, 0]
    center: [0.0, 0.0, 0.0]
    # Screen x (left to right), default [1, 0, 0]
    u_axis: [1.0, 0.0, 0.0]
    # Screen y (top to bottom), default [0, -1, 0]
    v_axis: [0.0, -1.0, 0.0]
    # Which point `center` is: center or top_left, default center
    anchor: center

# Intersection tolerances, defaults as shown
intersection:
  parallel_epsilon: 1.0e-6
  behind_epsilon: 1.0e-9

# Frames to hold the last point while tracking is lost, default 5
tracking:
  grace_period_frames: 5

# Smoothing (none, exponential, moving_average, kalman), default none
filter:
  kind: "none"
  exponential_alpha: 0.5
  moving_average_window: 5
  kalman_process_noise: 0.1
  kalman_measurement_noise: 0.001

# Consumer viewport in pixels, default 1920x1080
viewport:
  width: 1920
  height: 1080
"#;
