use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Transform, Vector3, TOLERANCE};

use super::{CurveAlgorithm, CurveData, CurveDomain, CurveKind};

const SEGMENTS: usize = 32;

/// An ellipse (or circle) in the local XY plane of its transform.
///
/// The parametric form is `P(u) = (rx cos u, ry sin u)` for `u` in `[0, 2pi)`;
/// `u = 0` lies on the local `+X` axis.
#[derive(Debug, Clone)]
pub struct ArcAlgorithm {
    transform: Transform,
    radius_x: f64,
    radius_y: f64,
}

impl ArcAlgorithm {
    /// Creates an ellipse algorithm from its placement and semi-axes.
    #[must_use]
    pub fn new(transform: Transform, radius_x: f64, radius_y: f64) -> Self {
        Self {
            transform,
            radius_x,
            radius_y,
        }
    }

    /// Binds to a [`CurveData::Arc`] record.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedCurveType`] for any other kind.
    pub fn from_data(data: &CurveData) -> Result<Self> {
        match data {
            CurveData::Arc {
                transform,
                radius_x,
                radius_y,
            } => Ok(Self::new(*transform, *radius_x, *radius_y)),
            other => Err(GeometryError::UnsupportedCurveType(other.kind()).into()),
        }
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        self.transform.position()
    }

    /// Returns the `(x, y)` semi-axes.
    #[must_use]
    pub fn radii(&self) -> (f64, f64) {
        (self.radius_x, self.radius_y)
    }

    /// Whether both semi-axes agree.
    #[must_use]
    pub fn is_circle(&self) -> bool {
        (self.radius_x - self.radius_y).abs() < TOLERANCE
    }
}

impl CurveAlgorithm for ArcAlgorithm {
    fn kind(&self) -> CurveKind {
        CurveKind::Arc
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, TAU)
    }

    fn segments_hint(&self) -> usize {
        SEGMENTS
    }

    fn d(&self, u: f64, order: usize) -> Result<Vector3> {
        let (sin, cos) = u.sin_cos();
        let (rx, ry) = (self.radius_x, self.radius_y);
        // Derivatives of (cos, sin) cycle with period four.
        let local = match order % 4 {
            0 => Vector3::new(rx * cos, ry * sin, 0.0),
            1 => Vector3::new(-rx * sin, ry * cos, 0.0),
            2 => Vector3::new(-rx * cos, -ry * sin, 0.0),
            _ => Vector3::new(rx * sin, -ry * cos, 0.0),
        };
        if order == 0 {
            Ok(self.transform.point_to_world(&Point3::from(local)).coords)
        } else {
            Ok(self.transform.vector_to_world(&local))
        }
    }

    fn u(&self, point: &Point3) -> Result<f64> {
        let local = self.transform.point_to_local(point);
        let from_cos = (local.x / self.radius_x).clamp(-1.0, 1.0).acos();
        let from_sin = (local.y / self.radius_y).clamp(-1.0, 1.0).asin();
        Ok(if from_sin < -TOLERANCE {
            TAU - from_cos
        } else {
            from_cos
        })
    }

    fn g(&self, point: &Point3) -> Result<f64> {
        let local = self.transform.point_to_local(point);
        let x = local.x / self.radius_x;
        let y = local.y / self.radius_y;
        Ok(x * x + y * y - 1.0)
    }
}
