use std::f64::consts::TAU;

use crate::error::Result;
use crate::math::{Point3, Transform, Vector3};

use super::{place, polar_angle, trig_derivative, SurfaceAlgorithm, SurfaceDomain, SurfaceKind};

/// A cylinder around the local `Z` axis.
///
/// `P(u, v) = (r cos u, r sin u, v)` in the local frame; `u = 0` lies on the
/// local `+X` axis and the normal points outward.
#[derive(Debug, Clone)]
pub struct CylinderAlgorithm {
    transform: Transform,
    radius: f64,
}

impl CylinderAlgorithm {
    /// Creates a cylinder algorithm.
    #[must_use]
    pub fn new(transform: Transform, radius: f64) -> Self {
        Self { transform, radius }
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl SurfaceAlgorithm for CylinderAlgorithm {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Cylinder
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, TAU, f64::NEG_INFINITY, f64::INFINITY)
    }

    fn d(&self, u: f64, v: f64, ru: usize, rv: usize) -> Result<Vector3> {
        let local = match (ru, rv) {
            (_, 0) => {
                let (c, s) = trig_derivative(u, ru);
                let z = if ru == 0 { v } else { 0.0 };
                Vector3::new(self.radius * c, self.radius * s, z)
            }
            (0, 1) => Vector3::z(),
            _ => Vector3::zeros(),
        };
        Ok(place(&self.transform, local, ru, rv))
    }

    fn g(&self, point: &Point3) -> Option<f64> {
        let local = self.transform.point_to_local(point);
        Some(local.x * local.x + local.y * local.y - self.radius * self.radius)
    }

    fn uv(&self, point: &Point3) -> Option<(f64, f64)> {
        let local = self.transform.point_to_local(point);
        Some((polar_angle(local.x, local.y), local.z))
    }
}
