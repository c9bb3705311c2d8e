use curvo::prelude::{Interpolation, NurbsCurve3D};
use nalgebra::Point4;
use tracing::trace;

use crate::error::{GeometryError, KernelError, Result};
use crate::math::{Point3, Transform, Vector3, TOLERANCE};

use super::{CurveAlgorithm, CurveData, CurveDomain, CurveKind};

const MIN_SEGMENTS: usize = 16;

/// 8-point Gauss-Legendre abscissae on `[-1, 1]` (positive half).
const GAUSS_NODES: [f64; 4] = [
    0.183_434_642_495_649_8,
    0.525_532_409_916_329_0,
    0.796_666_477_413_626_7,
    0.960_289_856_497_536_3,
];

/// Weights matching [`GAUSS_NODES`].
const GAUSS_WEIGHTS: [f64; 4] = [
    0.362_683_783_378_362_0,
    0.313_706_645_877_887_3,
    0.222_381_034_453_374_5,
    0.101_228_536_290_376_3,
];

/// Sub-intervals per knot span for arc-length quadrature.
const LENGTH_SUBDIVISIONS: usize = 4;

/// A placed NURBS curve backed by a `curvo` curve.
///
/// Control points live in the local frame of the transform. Parameters
/// outside the knot domain are clamped. There is no true implicit equation,
/// so [`CurveAlgorithm::g`] returns the signed distance to the closest point,
/// positive to the left of the tangent in the local XY plane.
#[derive(Debug, Clone)]
pub struct NurbsAlgorithm {
    transform: Transform,
    curve: NurbsCurve3D<f64>,
    knots: Vec<f64>,
    domain: (f64, f64),
}

impl NurbsAlgorithm {
    /// Creates an algorithm for a placed NURBS curve, validating the
    /// definition.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidNurbs`] if the degree is zero, there
    /// are not more control points than the degree, the knot vector has the
    /// wrong length or decreases, the domain is empty, or a weight is not
    /// positive.
    pub fn new(
        transform: Transform,
        controls: &[Point3],
        knots: &[f64],
        degree: usize,
        weights: Option<&[f64]>,
    ) -> Result<Self> {
        validate_knots(degree, knots, controls.len())?;
        let points = homogeneous(controls, weights)?;
        let curve = NurbsCurve3D::try_new(degree, points, knots.to_vec())
            .map_err(|e| GeometryError::InvalidNurbs(e.to_string()))?;
        Ok(Self {
            transform,
            curve,
            knots: knots.to_vec(),
            domain: (knots[degree], knots[controls.len()]),
        })
    }

    /// Binds to a [`CurveData::Nurbs`] record.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedCurveType`] for any other kind, or
    /// [`GeometryError::InvalidNurbs`] if the record is malformed.
    pub fn from_data(data: &CurveData) -> Result<Self> {
        match data {
            CurveData::Nurbs {
                transform,
                controls,
                knots,
                degree,
                weights,
            } => Self::new(*transform, controls, knots, *degree, weights.as_deref()),
            other => Err(GeometryError::UnsupportedCurveType(other.kind()).into()),
        }
    }

    /// Returns the underlying local-frame curve.
    #[must_use]
    pub fn curve(&self) -> &NurbsCurve3D<f64> {
        &self.curve
    }

    fn clamp(&self, u: f64) -> f64 {
        u.clamp(self.domain.0, self.domain.1)
    }

    /// Local-frame derivative of `order`, zero where the curve has none.
    fn local_derivative(&self, u: f64, order: usize) -> Vector3 {
        self.curve
            .rational_derivatives(self.clamp(u), order)
            .get(order)
            .copied()
            .unwrap_or_else(Vector3::zeros)
    }

    fn closest_local(&self, local: &Point3) -> Result<f64> {
        let u = self.curve.find_closest_parameter(local).map_err(|e| {
            GeometryError::Degenerate(format!("closest point search failed: {e}"))
        })?;
        Ok(self.clamp(u))
    }

    /// Arc length between two parameters, in either order.
    ///
    /// Gauss-Legendre quadrature of the speed, split at every knot inside the
    /// range.
    #[must_use]
    pub fn arc_length_between(&self, u0: f64, u1: f64) -> f64 {
        let lo = self.clamp(u0.min(u1));
        let hi = self.clamp(u0.max(u1));
        if hi <= lo {
            return 0.0;
        }

        let mut breaks = vec![lo];
        for &k in &self.knots {
            if k > lo && k < hi && breaks.last().is_some_and(|last| k > *last) {
                breaks.push(k);
            }
        }
        breaks.push(hi);

        let mut total = 0.0;
        for span in breaks.windows(2) {
            #[allow(clippy::cast_precision_loss)]
            let step = (span[1] - span[0]) / LENGTH_SUBDIVISIONS as f64;
            for s in 0..LENGTH_SUBDIVISIONS {
                #[allow(clippy::cast_precision_loss)]
                let start = span[0] + step * s as f64;
                total += self.gauss_speed(start, start + step);
            }
        }
        trace!(lo, hi, spans = breaks.len() - 1, total, "nurbs arc length");
        total
    }

    fn gauss_speed(&self, a: f64, b: f64) -> f64 {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (a + b);
        GAUSS_NODES
            .iter()
            .zip(GAUSS_WEIGHTS.iter())
            .map(|(x, w)| {
                let plus = self.local_derivative(mid + half * x, 1).norm();
                let minus = self.local_derivative(mid - half * x, 1).norm();
                w * (plus + minus)
            })
            .sum::<f64>()
            * half
    }
}

impl CurveAlgorithm for NurbsAlgorithm {
    fn kind(&self) -> CurveKind {
        CurveKind::Nurbs
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.domain.0, self.domain.1)
    }

    fn segments_hint(&self) -> usize {
        (2 * self.curve.control_points().len()).max(MIN_SEGMENTS)
    }

    fn d(&self, u: f64, order: usize) -> Result<Vector3> {
        if order == 0 {
            let local = self.curve.point_at(self.clamp(u));
            return Ok(self.transform.point_to_world(&local).coords);
        }
        Ok(self.transform.vector_to_world(&self.local_derivative(u, order)))
    }

    fn u(&self, point: &Point3) -> Result<f64> {
        self.closest_local(&self.transform.point_to_local(point))
    }

    fn g(&self, point: &Point3) -> Result<f64> {
        let local = self.transform.point_to_local(point);
        let t = self.closest_local(&local)?;
        let offset = local - self.curve.point_at(t);
        let tangent = self.local_derivative(t, 1);
        let distance = offset.norm();
        let side = tangent.x * offset.y - tangent.y * offset.x;
        Ok(if side < 0.0 { -distance } else { distance })
    }
}

/// Checks degree, control count and knot vector of one parametric direction.
pub(crate) fn validate_knots(degree: usize, knots: &[f64], control_count: usize) -> Result<()> {
    if degree == 0 {
        return Err(invalid("degree must be at least 1".into()));
    }
    if control_count <= degree {
        return Err(invalid(format!(
            "degree {degree} needs more than {degree} control points, got {control_count}"
        )));
    }
    if knots.len() != control_count + degree + 1 {
        return Err(invalid(format!(
            "expected {} knots, got {}",
            control_count + degree + 1,
            knots.len()
        )));
    }
    if knots.iter().any(|k| !k.is_finite()) || knots.windows(2).any(|w| w[1] < w[0]) {
        return Err(invalid("knots must be finite and non-decreasing".into()));
    }
    if knots[control_count] <= knots[degree] {
        return Err(invalid("knot vector has an empty domain".into()));
    }
    Ok(())
}

/// Weighted homogeneous control points `(x w, y w, z w, w)`.
pub(crate) fn homogeneous(
    controls: &[Point3],
    weights: Option<&[f64]>,
) -> Result<Vec<Point4<f64>>> {
    let Some(weights) = weights else {
        return Ok(controls.iter().map(|p| Point4::new(p.x, p.y, p.z, 1.0)).collect());
    };
    if weights.len() != controls.len() {
        return Err(invalid(format!(
            "expected {} weights, got {}",
            controls.len(),
            weights.len()
        )));
    }
    if weights.iter().any(|w| !(w.is_finite() && *w > 0.0)) {
        return Err(invalid("weights must be positive".into()));
    }
    Ok(controls
        .iter()
        .zip(weights)
        .map(|(p, &w)| Point4::new(p.x * w, p.y * w, p.z * w, w))
        .collect())
}

/// Global interpolation of `points` with a non-rational curve of `degree`.
///
/// Returns `(knots, controls)`; the curve passes through every input point.
pub(crate) fn interpolate(points: &[Point3], degree: usize) -> Result<(Vec<f64>, Vec<Point3>)> {
    if degree == 0 {
        return Err(invalid("degree must be at least 1".into()));
    }
    if points.len() <= degree {
        return Err(GeometryError::Degenerate(format!(
            "interpolating with degree {degree} needs more than {degree} points"
        ))
        .into());
    }
    if points.windows(2).any(|w| (w[1] - w[0]).norm() < TOLERANCE) {
        return Err(GeometryError::Degenerate("consecutive fit points coincide".into()).into());
    }
    let curve = NurbsCurve3D::<f64>::interpolate(&points.to_vec(), degree)
        .map_err(|e| GeometryError::Degenerate(format!("interpolation failed: {e}")))?;
    let knots: Vec<f64> = curve.knots().iter().copied().collect();
    let controls = curve.dehomogenized_control_points();
    trace!(points = points.len(), controls = controls.len(), "interpolated nurbs");
    Ok((knots, controls))
}

fn invalid(message: String) -> KernelError {
    GeometryError::InvalidNurbs(message).into()
}
