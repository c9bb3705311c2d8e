use crate::error::Result;
use crate::math::{Point3, Transform, Vector3};

use super::{place, SurfaceAlgorithm, SurfaceDomain, SurfaceKind};

/// The local XY plane of a transform.
///
/// `P(u, v) = position + u * x_axis + v * y_axis`; the normal is the local
/// `+Z` axis.
#[derive(Debug, Clone)]
pub struct PlaneAlgorithm {
    transform: Transform,
}

impl PlaneAlgorithm {
    /// Creates a plane algorithm.
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }

    /// Returns the origin of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        self.transform.position()
    }
}

impl SurfaceAlgorithm for PlaneAlgorithm {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Plane
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
    }

    fn d(&self, u: f64, v: f64, ru: usize, rv: usize) -> Result<Vector3> {
        let local = match (ru, rv) {
            (0, 0) => Vector3::new(u, v, 0.0),
            (1, 0) => Vector3::x(),
            (0, 1) => Vector3::y(),
            _ => Vector3::zeros(),
        };
        Ok(place(&self.transform, local, ru, rv))
    }

    fn normal(&self, _u: f64, _v: f64) -> Result<Vector3> {
        Ok(self.transform.z_axis())
    }

    fn g(&self, point: &Point3) -> Option<f64> {
        Some(self.transform.point_to_local(point).z)
    }

    fn uv(&self, point: &Point3) -> Option<(f64, f64)> {
        let local = self.transform.point_to_local(point);
        Some((local.x, local.y))
    }
}
