//! World gaze ray construction.

use crate::{
    config::GeometryConfig,
    constants::{DEGENERATE_DETERMINANT_EPSILON, MIN_VECTOR_NORM},
    error::FrameError,
    pose::HeadPose,
};
use nalgebra::{Point3, Unit, Vector3};

/// Gaze ray in world coordinates with a unit-length direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRay {
    pub origin: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
}

impl WorldRay {
    /// Create a ray, normalizing `direction`. Returns `None` for a zero or
    /// non-finite direction.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        if !direction.iter().all(|c| c.is_finite()) {
            return None;
        }
        Unit::try_new(direction, MIN_VECTOR_NORM).map(|direction| Self { origin, direction })
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * t
    }
}

/// Transform the head-local eye ray into world space.
///
/// The pose is camera-relative; the camera sits at `geometry.camera_offset`
/// in the screen-anchored world frame with axes aligned to it.
///
/// # Errors
///
/// Returns [`FrameError::MalformedPose`] when the rotation is non-finite or
/// singular, or the resulting ray is unusable.
pub fn build_world_ray(pose: &HeadPose, geometry: &GeometryConfig) -> Result<WorldRay, FrameError> {
    let rotation = &pose.rotation;
    if !rotation.iter().all(|c| c.is_finite()) {
        return Err(FrameError::MalformedPose("rotation contains non-finite values".into()));
    }
    // Scale-relative determinant: a uniformly scaled rotation is still valid
    let scale = rotation.norm() / 3.0_f64.sqrt();
    let det = rotation.determinant();
    if scale <= MIN_VECTOR_NORM || (det / scale.powi(3)).abs() <= DEGENERATE_DETERMINANT_EPSILON {
        return Err(FrameError::MalformedPose(format!("singular rotation (det = {det:e})")));
    }

    let head = geometry.camera_offset + pose.position;
    let origin = Point3::from(head + rotation * geometry.eye_origin);
    if !origin.coords.iter().all(|c| c.is_finite()) {
        return Err(FrameError::MalformedPose("ray origin is not finite".into()));
    }

    WorldRay::new(origin, rotation * geometry.eye_direction)
        .ok_or_else(|| FrameError::MalformedPose("gaze direction collapsed".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenConfig;
    use nalgebra::{Matrix3, Rotation3};

    fn geometry(camera_offset: Vector3<f64>, eye_origin: Vector3<f64>, eye_direction: Vector3<f64>) -> GeometryConfig {
        GeometryConfig {
            camera_offset,
            eye_origin,
            eye_direction,
            screen: ScreenConfig::centered(1.0, 1.0),
        }
    }

    #[test]
    fn test_identity_pose() {
        let geometry = geometry(Vector3::zeros(), Vector3::zeros(), Vector3::new(0.0, 0.0, 2.0));
        let pose = HeadPose::facing_forward(Vector3::new(1.0, 2.0, -3.0));
        let ray = build_world_ray(&pose, &geometry).unwrap();

        assert_eq!(ray.origin, Point3::new(1.0, 2.0, -3.0));
        assert!((ray.direction.into_inner() - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_camera_offset_and_local_origin() {
        let geometry = geometry(
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::new(0.0, 3.0, 4.0),
            Vector3::z(),
        );
        // Head yawed 90 degrees about +Y: local +Z maps to world +X
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2);
        let pose = HeadPose::new(Vector3::new(0.0, 0.0, -50.0), rotation.into_inner());
        let ray = build_world_ray(&pose, &geometry).unwrap();

        assert!((ray.origin - Point3::new(4.0, 13.0, -50.0)).norm() < 1e-9);
        assert!((ray.direction.into_inner() - Vector3::x()).norm() < 1e-9);
    }

    #[test]
    fn test_scaled_rotation_still_unit_direction() {
        let geometry = geometry(Vector3::zeros(), Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0));
        let pose = HeadPose::new(Vector3::zeros(), Matrix3::identity() * 3.5);
        let ray = build_world_ray(&pose, &geometry).unwrap();
        assert!((ray.direction.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_uniform_scale_is_accepted() {
        let geometry = geometry(Vector3::zeros(), Vector3::zeros(), Vector3::z());
        let rotation = Rotation3::from_axis_angle(&Vector3::x_axis(), 0.3).into_inner() * 1e-3;
        let pose = HeadPose::new(Vector3::zeros(), rotation);
        let ray = build_world_ray(&pose, &geometry).unwrap();

        let expected = Rotation3::from_axis_angle(&Vector3::x_axis(), 0.3) * Vector3::z();
        assert!((ray.direction.into_inner() - expected).norm() < 1e-9);
    }

    #[test]
    fn test_nan_rotation_is_malformed() {
        let geometry = geometry(Vector3::zeros(), Vector3::zeros(), Vector3::z());
        let mut rotation = Matrix3::identity();
        rotation[(2, 1)] = f64::NAN;
        let pose = HeadPose::new(Vector3::zeros(), rotation);
        assert!(matches!(
            build_world_ray(&pose, &geometry),
            Err(FrameError::MalformedPose(_))
        ));
    }

    #[test]
    fn test_singular_rotation_is_malformed() {
        let geometry = geometry(Vector3::zeros(), Vector3::zeros(), Vector3::z());
        let pose = HeadPose::new(Vector3::zeros(), Matrix3::zeros());
        assert!(matches!(
            build_world_ray(&pose, &geometry),
            Err(FrameError::MalformedPose(_))
        ));

        // Rank 2: a projection onto the XY plane
        let flat = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        let pose = HeadPose::new(Vector3::zeros(), flat);
        assert!(build_world_ray(&pose, &geometry).is_err());
    }

    #[test]
    fn test_ray_at() {
        let ray = WorldRay::new(Point3::new(0.0, 0.0, -2.0), Vector3::new(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(ray.at(2.0), Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_rejects_degenerate_direction() {
        assert!(WorldRay::new(Point3::origin(), Vector3::zeros()).is_none());
        assert!(WorldRay::new(Point3::origin(), Vector3::new(f64::NAN, 0.0, 1.0)).is_none());
    }
}
