//! Webcam gaze estimation geometry for real-time screen pointing.
//!
//! This library turns a per-frame head pose reported by a face tracker into a
//! point on a physical display. It does no image processing itself; the face
//! tracker is an external collaborator that hands over a rigid transform per
//! frame (or reports that no face was found).
//!
//! The pipeline consists of:
//! 1. Extracting position and rotation from the frame's transform
//! 2. Building a world-space gaze ray from the head pose and device geometry
//! 3. Intersecting the ray with the screen plane
//! 4. Mapping the hit point to normalized and pixel coordinates
//! 5. Smoothing, then a tracking state machine that bridges short detection gaps
//!
//! # Examples
//!
//! ## Stateless geometry
//!
//! ```no_run
//! use webcam_gaze::{
//!     config::{Config, GeometryConfig},
//!     pipeline::GazePipeline,
//!     pose::FrameInput,
//!     screen::Viewport,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::with_geometry(GeometryConfig::macbook_pro_14());
//! let pipeline = GazePipeline::new(&config)?;
//!
//! let frame = FrameInput::Pose {
//!     position: [2.0, -8.0, -55.0],
//!     rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
//! };
//! match pipeline.locate(&frame, Viewport::new(3024, 1964)) {
//!     Ok(point) => println!("Looking at ({:.0}, {:.0})", point.pixel_x, point.pixel_y),
//!     Err(reason) => println!("No gaze point: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Tracking a stream of frames
//!
//! ```no_run
//! use webcam_gaze::{
//!     config::Config,
//!     pipeline::{GazePipeline, GazeSession},
//!     pose::FrameInput,
//!     tracking::FrameResult,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_file("gaze.yaml")?;
//! let pipeline = GazePipeline::new(&config)?;
//! let mut session = GazeSession::new(&config)?;
//!
//! let frames: Vec<FrameInput> = Vec::new();
//! for frame in &frames {
//!     match pipeline.process_frame(&mut session, frame) {
//!         FrameResult::Tracking(point) => println!("gaze {:.3} {:.3}", point.normalized_x, point.normalized_y),
//!         FrameResult::Held(point) => println!("held {:.3} {:.3}", point.normalized_x, point.normalized_y),
//!         FrameResult::NoResult => println!("none"),
//!     }
//! }
//!
//! // Stop tracking; the next frame starts from scratch
//! session.disable();
//! # Ok(())
//! # }
//! ```

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Error types and result handling
pub mod error;

/// Smoothing filters for gaze coordinates
pub mod filters;

/// Per-frame pipeline and session state
pub mod pipeline;

/// Frame input and head pose extraction
pub mod pose;

/// World-space gaze ray construction
pub mod ray;

/// Screen plane intersection and coordinate mapping
pub mod screen;

/// Tracking state machine
pub mod tracking;

pub use error::{Error, FrameError, Result};
pub use pipeline::{GazePipeline, GazeSession};
pub use tracking::{FrameResult, TrackingState};
