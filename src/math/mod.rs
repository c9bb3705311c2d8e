pub mod precise;
pub mod transform;

pub use transform::{Frame, FrameId, FrameTree, Transform};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 matrix, used for orthonormal curve frames.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Unit quaternion rotation.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Rigid-body placement (rotation followed by translation).
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Signed angle of the XY projection of `v`, measured from `+X`.
#[must_use]
pub fn planar_angle(v: &Vector3) -> f64 {
    v.y.atan2(v.x)
}

/// Projects `point` onto the plane `z = z`, keeping its X and Y.
#[must_use]
pub fn flatten(point: &Point3, z: f64) -> Point3 {
    Point3::new(point.x, point.y, z)
}
