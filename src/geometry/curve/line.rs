use crate::error::{GeometryError, Result};
use crate::math::{Point3, Transform, Vector3};

use super::{CurveAlgorithm, CurveData, CurveDomain, CurveKind};

const SEGMENTS: usize = 16;

/// A bounded line along the local `+X` axis of its transform.
///
/// The parametric form is `P(u) = position + u * x_axis` for `u` in
/// `[0, length]`, so the parameter is the arc length from the origin.
#[derive(Debug, Clone)]
pub struct LineAlgorithm {
    transform: Transform,
    length: f64,
}

impl LineAlgorithm {
    /// Creates a line algorithm from its placement and length.
    #[must_use]
    pub fn new(transform: Transform, length: f64) -> Self {
        Self { transform, length }
    }

    /// Binds to a [`CurveData::Line`] record.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedCurveType`] for any other kind.
    pub fn from_data(data: &CurveData) -> Result<Self> {
        match data {
            CurveData::Line { transform, length } => Ok(Self::new(*transform, *length)),
            other => Err(GeometryError::UnsupportedCurveType(other.kind()).into()),
        }
    }

    /// Returns the start point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        self.transform.position()
    }

    /// Returns the unit direction of the line.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        self.transform.x_axis()
    }

    /// Returns the length of the line.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Coefficients `(A, B, C)` of `A x + B y + C = 0` for the line's
    /// projection onto the world XY plane, with `(A, B)` a unit normal.
    #[must_use]
    pub fn implicit_coefficients(&self) -> (f64, f64, f64) {
        let (sin, cos) = self.transform.angle().sin_cos();
        let (a, b) = (-sin, cos);
        let pos = self.transform.position();
        (a, b, -a * pos.x - b * pos.y)
    }
}

impl CurveAlgorithm for LineAlgorithm {
    fn kind(&self) -> CurveKind {
        CurveKind::Line
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.length)
    }

    fn segments_hint(&self) -> usize {
        SEGMENTS
    }

    fn d(&self, u: f64, order: usize) -> Result<Vector3> {
        Ok(match order {
            0 => (self.origin() + self.direction() * u).coords,
            1 => self.direction(),
            _ => Vector3::zeros(),
        })
    }

    fn u(&self, point: &Point3) -> Result<f64> {
        Ok((point - self.origin()).dot(&self.direction()))
    }

    fn g(&self, point: &Point3) -> Result<f64> {
        Ok(self.transform.point_to_local(point).y)
    }
}
