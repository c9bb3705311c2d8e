use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::Result;
use crate::math::{Point3, Transform, Vector3};

use super::{place, polar_angle, trig_derivative, SurfaceAlgorithm, SurfaceDomain, SurfaceKind};

/// A sphere centered at the transform origin.
///
/// `P(u, v) = (r cos v cos u, r cos v sin u, r sin v)`; `u` is the longitude
/// in `[0, 2pi]` and `v` the latitude in `[-pi/2, pi/2]`.
#[derive(Debug, Clone)]
pub struct SphereAlgorithm {
    transform: Transform,
    radius: f64,
}

impl SphereAlgorithm {
    /// Creates a sphere algorithm.
    #[must_use]
    pub fn new(transform: Transform, radius: f64) -> Self {
        Self { transform, radius }
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        self.transform.position()
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl SurfaceAlgorithm for SphereAlgorithm {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Sphere
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, TAU, -FRAC_PI_2, FRAC_PI_2)
    }

    fn d(&self, u: f64, v: f64, ru: usize, rv: usize) -> Result<Vector3> {
        let (cu, su) = trig_derivative(u, ru);
        let (cv, sv) = trig_derivative(v, rv);
        let z = if ru == 0 { sv } else { 0.0 };
        let local = Vector3::new(cv * cu, cv * su, z) * self.radius;
        Ok(place(&self.transform, local, ru, rv))
    }

    fn g(&self, point: &Point3) -> Option<f64> {
        let local = self.transform.point_to_local(point);
        Some(local.coords.norm_squared() - self.radius * self.radius)
    }

    fn uv(&self, point: &Point3) -> Option<(f64, f64)> {
        let local = self.transform.point_to_local(point);
        let u = polar_angle(local.x, local.y);
        let v = (local.z / self.radius).clamp(-1.0, 1.0).asin();
        Some((u, v))
    }
}
