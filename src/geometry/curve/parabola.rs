use crate::error::{GeometryError, Result};
use crate::math::{Point3, Transform, Vector3};

use super::{CurveAlgorithm, CurveData, CurveDomain, CurveKind};

const SEGMENTS: usize = 32;

/// A parabola opening along the local `+X` axis.
///
/// The parametric form is `P(u) = (f u^2, 2 f u)`, with the vertex at the
/// transform origin and the focus at `(f, 0)`.
#[derive(Debug, Clone)]
pub struct ParabolaAlgorithm {
    transform: Transform,
    focus: f64,
}

impl ParabolaAlgorithm {
    /// Creates a parabola algorithm from its placement and focal length.
    #[must_use]
    pub fn new(transform: Transform, focus: f64) -> Self {
        Self { transform, focus }
    }

    /// Binds to a [`CurveData::Parabola`] record.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedCurveType`] for any other kind.
    pub fn from_data(data: &CurveData) -> Result<Self> {
        match data {
            CurveData::Parabola { transform, focus } => Ok(Self::new(*transform, *focus)),
            other => Err(GeometryError::UnsupportedCurveType(other.kind()).into()),
        }
    }

    /// Returns the focal length.
    #[must_use]
    pub fn focus(&self) -> f64 {
        self.focus
    }
}

impl CurveAlgorithm for ParabolaAlgorithm {
    fn kind(&self) -> CurveKind {
        CurveKind::Parabola
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn segments_hint(&self) -> usize {
        SEGMENTS
    }

    fn d(&self, u: f64, order: usize) -> Result<Vector3> {
        let f = self.focus;
        let local = match order {
            0 => Vector3::new(f * u * u, 2.0 * f * u, 0.0),
            1 => Vector3::new(2.0 * f * u, 2.0 * f, 0.0),
            2 => Vector3::new(2.0 * f, 0.0, 0.0),
            _ => Vector3::zeros(),
        };
        if order == 0 {
            Ok(self.transform.point_to_world(&Point3::from(local)).coords)
        } else {
            Ok(self.transform.vector_to_world(&local))
        }
    }

    fn u(&self, point: &Point3) -> Result<f64> {
        let local = self.transform.point_to_local(point);
        Ok(local.y / (2.0 * self.focus))
    }

    fn g(&self, point: &Point3) -> Result<f64> {
        let local = self.transform.point_to_local(point);
        Ok(local.y * local.y - 4.0 * self.focus * local.x)
    }
}
