//! Per-frame gaze estimation pipeline.
//!
//! [`GazePipeline`] holds everything derived from configuration and never
//! changes after construction, so one instance can be shared across threads.
//! All frame-to-frame memory (tracking state, held point, filter history)
//! lives in a [`GazeSession`] that the caller owns and passes in explicitly.
//!
//! ```no_run
//! use webcam_gaze::{
//!     config::{Config, GeometryConfig},
//!     pipeline::{GazePipeline, GazeSession},
//!     pose::FrameInput,
//! };
//!
//! # fn main() -> webcam_gaze::Result<()> {
//! let config = Config::with_geometry(GeometryConfig::macbook_pro_14());
//! let pipeline = GazePipeline::new(&config)?;
//! let mut session = GazeSession::new(&config)?;
//!
//! let frame = FrameInput::Pose {
//!     position: [0.0, -8.0, -50.0],
//!     rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
//! };
//! if let Some(point) = pipeline.process_frame(&mut session, &frame).point() {
//!     println!("gaze at ({:.0}, {:.0})", point.pixel_x, point.pixel_y);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
    config::{Config, GeometryConfig, IntersectionConfig},
    error::FrameError,
    filters::{create_filter, GazeFilter},
    pose::{extract_head_pose, FrameInput, HeadPose},
    ray::{build_world_ray, WorldRay},
    screen::{GazePoint, ScreenPlane, Viewport},
    tracking::{FrameResult, Tracker, TrackingState},
    Result,
};
use log::info;

/// Immutable, configuration-derived part of the pipeline
#[derive(Debug, Clone)]
pub struct GazePipeline {
    geometry: GeometryConfig,
    tolerances: IntersectionConfig,
    plane: ScreenPlane,
}

impl GazePipeline {
    /// Validate configuration and derive the screen plane
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConfigError`] if the configuration is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let plane = ScreenPlane::from_config(&config.geometry.screen)?;
        let (width, height) = plane.size();
        info!(
            "Gaze pipeline ready: screen {width}x{height} at {:?}, camera at {:?}",
            plane.origin().coords.as_slice(),
            config.geometry.camera_offset.as_slice()
        );

        Ok(Self {
            geometry: config.geometry.clone(),
            tolerances: config.intersection,
            plane,
        })
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    pub fn plane(&self) -> &ScreenPlane {
        &self.plane
    }

    /// Gaze ray for a head pose
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::MalformedPose`] for a degenerate pose.
    pub fn world_ray(&self, pose: &HeadPose) -> std::result::Result<WorldRay, FrameError> {
        build_world_ray(pose, &self.geometry)
    }

    /// Run the stateless geometry for one head pose
    ///
    /// # Errors
    ///
    /// Returns the [`FrameError`] explaining why no point was produced.
    pub fn locate_pose(&self, pose: &HeadPose, viewport: Viewport) -> std::result::Result<GazePoint, FrameError> {
        let ray = self.world_ray(pose)?;
        let hit = self.plane.intersect(&ray, &self.tolerances)?;
        Ok(self.plane.map_to_screen(&hit, viewport))
    }

    /// Run the stateless geometry for one frame
    ///
    /// # Errors
    ///
    /// Returns the [`FrameError`] explaining why no point was produced.
    pub fn locate(&self, input: &FrameInput, viewport: Viewport) -> std::result::Result<GazePoint, FrameError> {
        let pose = extract_head_pose(input)?;
        self.locate_pose(&pose, viewport)
    }

    /// Process one frame: locate, smooth, then let the tracker decide what to emit
    pub fn process_frame(&self, session: &mut GazeSession, input: &FrameInput) -> FrameResult {
        let outcome = self
            .locate(input, session.viewport)
            .map(|point| session.smooth(point));

        let result = session.tracker.advance(outcome);
        if session.tracker.is_expired() && session.filter_primed {
            session.filter.reset();
            session.filter_primed = false;
        }

        // Held pixels follow the current viewport
        match result {
            FrameResult::Held(point) => FrameResult::Held(GazePoint::from_normalized(
                point.normalized_x,
                point.normalized_y,
                session.viewport,
            )),
            other => other,
        }
    }
}

/// Mutable per-stream context threaded through [`GazePipeline::process_frame`]
pub struct GazeSession {
    tracker: Tracker,
    filter: Box<dyn GazeFilter>,
    filter_primed: bool,
    viewport: Viewport,
}

impl GazeSession {
    /// Create a session using the tracking, filter and viewport settings
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FilterError`] if the filter cannot be created.
    pub fn new(config: &Config) -> Result<Self> {
        let filter = create_filter(&config.filter)?;
        info!(
            "Gaze session: grace period {} frames, filter {}, viewport {}x{}",
            config.tracking.grace_period_frames,
            filter.name(),
            config.viewport.width,
            config.viewport.height
        );
        Ok(Self::with_parts(
            Tracker::new(config.tracking.grace_period_frames),
            filter,
            config.viewport,
        ))
    }

    /// Assemble a session from explicit parts
    pub fn with_parts(tracker: Tracker, filter: Box<dyn GazeFilter>, viewport: Viewport) -> Self {
        Self {
            tracker,
            filter,
            filter_primed: false,
            viewport,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.tracker.state()
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change the pixel viewport; later points use the new size
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Stop tracking: back to `Idle`, held point and filter history dropped
    pub fn disable(&mut self) {
        self.tracker.disable();
        self.filter.reset();
        self.filter_primed = false;
    }

    fn smooth(&mut self, point: GazePoint) -> GazePoint {
        self.filter_primed = true;
        let (x, y) = self.filter.apply(point.normalized_x, point.normalized_y);
        GazePoint::from_normalized(x, y, self.viewport)
    }
}

impl std::fmt::Debug for GazeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GazeSession")
            .field("tracker", &self.tracker)
            .field("filter", &self.filter.name())
            .field("viewport", &self.viewport)
            .finish()
    }
}
