use std::f64::consts::TAU;

use crate::error::Result;
use crate::math::{Point3, Transform, Vector3};

use super::{place, polar_angle, trig_derivative, SurfaceAlgorithm, SurfaceDomain, SurfaceKind};

/// A cone around the local `Z` axis.
///
/// `P(u, v) = (rho(v) cos u, rho(v) sin u, v)` with `rho(v) = r + v tan(a)`;
/// `r` is the radius at `v = 0` and `a` the half-angle.
#[derive(Debug, Clone)]
pub struct ConeAlgorithm {
    transform: Transform,
    radius: f64,
    half_angle: f64,
}

impl ConeAlgorithm {
    /// Creates a cone algorithm.
    #[must_use]
    pub fn new(transform: Transform, radius: f64, half_angle: f64) -> Self {
        Self {
            transform,
            radius,
            half_angle,
        }
    }

    /// Returns the radius at `v = 0`.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the half-angle.
    #[must_use]
    pub fn half_angle(&self) -> f64 {
        self.half_angle
    }

    fn rho(&self, v: f64) -> f64 {
        self.radius + v * self.half_angle.tan()
    }
}

impl SurfaceAlgorithm for ConeAlgorithm {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Cone
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, TAU, f64::NEG_INFINITY, f64::INFINITY)
    }

    fn d(&self, u: f64, v: f64, ru: usize, rv: usize) -> Result<Vector3> {
        let rho = match rv {
            0 => self.rho(v),
            1 => self.half_angle.tan(),
            _ => 0.0,
        };
        let (c, s) = trig_derivative(u, ru);
        let z = match (ru, rv) {
            (0, 0) => v,
            (0, 1) => 1.0,
            _ => 0.0,
        };
        let local = Vector3::new(rho * c, rho * s, z);
        Ok(place(&self.transform, local, ru, rv))
    }

    fn g(&self, point: &Point3) -> Option<f64> {
        let local = self.transform.point_to_local(point);
        let rho = self.rho(local.z);
        Some(local.x * local.x + local.y * local.y - rho * rho)
    }

    fn uv(&self, point: &Point3) -> Option<(f64, f64)> {
        let local = self.transform.point_to_local(point);
        Some((polar_angle(local.x, local.y), local.z))
    }
}
