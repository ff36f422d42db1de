//! Screen plane intersection and screen-space mapping.
//!
//! The physical display is modelled as a plane with an origin, two orthonormal
//! in-plane axes `u` (screen x) and `v` (screen y) and the normal `u × v`.
//! A gaze ray is intersected with that plane and the hit point is projected
//! onto the axes to obtain normalized screen coordinates. No clamping happens
//! here: a user looking past the bezel yields values outside `[0, 1]`.

use crate::{
    config::{IntersectionConfig, PlaneAnchor, ScreenConfig},
    constants::{MIN_VECTOR_NORM, ORTHOGONALITY_TOLERANCE},
    error::{FrameError, IntersectionMiss},
    ray::WorldRay,
    Error, Result,
};
use nalgebra::{Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pixel dimensions of the consumer's viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl FromStr for Viewport {
    type Err = Error;

    /// Parse `WIDTHxHEIGHT`, e.g. `1512x982`
    fn from_str(value: &str) -> Result<Self> {
        let (width, height) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::InvalidInput(format!("Expected WIDTHxHEIGHT, got '{value}'")))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| Error::InvalidInput(format!("Invalid viewport dimension '{part}': {e}")))
        };
        let viewport = Self::new(parse(width)?, parse(height)?);
        if viewport.width == 0 || viewport.height == 0 {
            return Err(Error::InvalidInput("Viewport dimensions must be non-zero".to_string()));
        }
        Ok(viewport)
    }
}

/// A point on (or off) the screen for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazePoint {
    /// Horizontal position, 0 at the left edge and 1 at the right edge
    pub normalized_x: f64,
    /// Vertical position, 0 at the top edge and 1 at the bottom edge
    pub normalized_y: f64,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

impl GazePoint {
    /// Derive pixel coordinates from normalized ones
    pub fn from_normalized(normalized_x: f64, normalized_y: f64, viewport: Viewport) -> Self {
        Self {
            normalized_x,
            normalized_y,
            pixel_x: normalized_x * f64::from(viewport.width),
            pixel_y: normalized_y * f64::from(viewport.height),
        }
    }

    /// Whether the point lies on the visible screen
    pub fn is_on_screen(&self) -> bool {
        (0.0..=1.0).contains(&self.normalized_x) && (0.0..=1.0).contains(&self.normalized_y)
    }

    /// Integer pixel position clamped into the viewport, for cursor placement
    pub fn clamped_pixel(&self, viewport: Viewport) -> (u32, u32) {
        (
            clamp_to_extent(self.pixel_x, viewport.width),
            clamp_to_extent(self.pixel_y, viewport.height),
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped into [0, extent - 1] first
fn clamp_to_extent(value: f64, extent: u32) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = f64::from(extent.saturating_sub(1));
    value.clamp(0.0, max) as u32
}

/// The physical screen as a plane in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPlane {
    origin: Point3<f64>,
    u: Unit<Vector3<f64>>,
    v: Unit<Vector3<f64>>,
    normal: Unit<Vector3<f64>>,
    width: f64,
    height: f64,
    anchor: PlaneAnchor,
}

impl ScreenPlane {
    /// Build the plane from configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the size is not positive and finite,
    /// an axis is zero or non-finite, or the axes are not orthogonal.
    pub fn from_config(screen: &ScreenConfig) -> Result<Self> {
        if !(screen.width.is_finite() && screen.width > 0.0) {
            return Err(Error::ConfigError(format!(
                "Screen width must be positive, got {}",
                screen.width
            )));
        }
        if !(screen.height.is_finite() && screen.height > 0.0) {
            return Err(Error::ConfigError(format!(
                "Screen height must be positive, got {}",
                screen.height
            )));
        }
        if !screen.center.iter().all(|c| c.is_finite()) {
            return Err(Error::ConfigError("Screen center must be finite".to_string()));
        }

        let u = unit_axis("u_axis", &screen.u_axis)?;
        let v = unit_axis("v_axis", &screen.v_axis)?;
        let cos = u.dot(&*v);
        if cos.abs() > ORTHOGONALITY_TOLERANCE {
            return Err(Error::ConfigError(format!(
                "Screen axes must be orthogonal (cos = {cos:.6})"
            )));
        }

        let normal = Unit::new_normalize(u.cross(&*v));

        Ok(Self {
            origin: Point3::from(screen.center),
            u,
            v,
            normal,
            width: screen.width,
            height: screen.height,
            anchor: screen.anchor,
        })
    }

    pub fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    pub fn normal(&self) -> &Unit<Vector3<f64>> {
        &self.normal
    }

    /// Physical (width, height)
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Intersect a gaze ray with the plane.
    ///
    /// Solves `dot(origin + t * direction - plane_origin, normal) = 0` for `t`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::NoIntersection`] when the ray is parallel to the
    /// plane or the plane lies behind the ray origin.
    pub fn intersect(&self, ray: &WorldRay, tolerances: &IntersectionConfig) -> std::result::Result<Point3<f64>, FrameError> {
        let denom = ray.direction.dot(&*self.normal);
        if denom.abs() < tolerances.parallel_epsilon {
            return Err(FrameError::NoIntersection(IntersectionMiss::Parallel));
        }

        let t = (self.origin - ray.origin).dot(&*self.normal) / denom;
        if t < -tolerances.behind_epsilon {
            return Err(FrameError::NoIntersection(IntersectionMiss::Behind));
        }

        Ok(ray.at(t))
    }

    /// Project a point on the plane into normalized and pixel coordinates
    pub fn map_to_screen(&self, point: &Point3<f64>, viewport: Viewport) -> GazePoint {
        let offset = point - self.origin;
        let anchor = self.anchor.offset();
        let x = offset.dot(&*self.u) / self.width + anchor;
        let y = offset.dot(&*self.v) / self.height + anchor;
        GazePoint::from_normalized(x, y, viewport)
    }
}

fn unit_axis(name: &str, axis: &Vector3<f64>) -> Result<Unit<Vector3<f64>>> {
    if !axis.iter().all(|c| c.is_finite()) {
        return Err(Error::ConfigError(format!("Screen {name} must be finite")));
    }
    Unit::try_new(*axis, MIN_VECTOR_NORM)
        .ok_or_else(|| Error::ConfigError(format!("Screen {name} must be non-zero")))
}
