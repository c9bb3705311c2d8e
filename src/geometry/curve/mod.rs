mod arc;
mod builder;
mod hyperbola;
mod line;
mod nurbs;
mod parabola;
mod registry;

pub use arc::ArcAlgorithm;
pub use builder::CurveBuilder;
pub use hyperbola::HyperbolaAlgorithm;
pub use line::LineAlgorithm;
pub use nurbs::NurbsAlgorithm;
pub(crate) use nurbs::{homogeneous, validate_knots};
pub use parabola::ParabolaAlgorithm;
pub use registry::{default_factory, AlgorithmRegistry, CurveFactory};

use crate::error::{GeometryError, Result};
use crate::math::{Matrix3, Point3, Transform, Vector3, TOLERANCE};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Returns whether both ends are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.t_min.is_finite() && self.t_max.is_finite()
    }

    /// Signed width `t_max - t_min`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Parameter at fraction `s` of the way from `t_min` to `t_max`.
    #[must_use]
    pub fn lerp(&self, s: f64) -> f64 {
        self.t_min + (self.t_max - self.t_min) * s
    }
}

/// Tag of a [`CurveData`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Line,
    Arc,
    Hyperbola,
    Parabola,
    Nurbs,
}

impl CurveKind {
    /// Every curve kind.
    pub const ALL: [CurveKind; 5] = [
        CurveKind::Line,
        CurveKind::Arc,
        CurveKind::Hyperbola,
        CurveKind::Parabola,
        CurveKind::Nurbs,
    ];

    /// Structural complexity, lowest for lines.
    #[must_use]
    pub fn complexity(self) -> u8 {
        match self {
            CurveKind::Line => 0,
            CurveKind::Arc => 1,
            CurveKind::Parabola => 2,
            CurveKind::Hyperbola => 3,
            CurveKind::Nurbs => 4,
        }
    }

    /// Whether `g(point)` is a true algebraic implicit equation.
    #[must_use]
    pub fn has_implicit(self) -> bool {
        !matches!(self, CurveKind::Nurbs)
    }
}

/// Immutable definition of a curve.
///
/// Every variant is placed by a [`Transform`]; the kind-specific parameters
/// describe the curve in its local XY plane. Records are produced by
/// [`CurveBuilder`] and shared by handle, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveData {
    /// Line along local `+X`, parameterized by arc length.
    Line { transform: Transform, length: f64 },
    /// Ellipse `(rx cos u, ry sin u)`; a circle when the radii agree.
    Arc {
        transform: Transform,
        radius_x: f64,
        radius_y: f64,
    },
    /// Hyperbola `(a sec u, b tan u)`.
    Hyperbola {
        transform: Transform,
        radius_x: f64,
        radius_y: f64,
    },
    /// Parabola `(f u^2, 2 f u)` with its focus at `(f, 0)`.
    Parabola { transform: Transform, focus: f64 },
    /// B-spline with control points in local coordinates.
    Nurbs {
        transform: Transform,
        controls: Vec<Point3>,
        knots: Vec<f64>,
        degree: usize,
        weights: Option<Vec<f64>>,
    },
}

impl CurveData {
    /// Returns the variant tag.
    #[must_use]
    pub fn kind(&self) -> CurveKind {
        match self {
            CurveData::Line { .. } => CurveKind::Line,
            CurveData::Arc { .. } => CurveKind::Arc,
            CurveData::Hyperbola { .. } => CurveKind::Hyperbola,
            CurveData::Parabola { .. } => CurveKind::Parabola,
            CurveData::Nurbs { .. } => CurveKind::Nurbs,
        }
    }

    /// Returns the placement of the curve.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        match self {
            CurveData::Line { transform, .. }
            | CurveData::Arc { transform, .. }
            | CurveData::Hyperbola { transform, .. }
            | CurveData::Parabola { transform, .. }
            | CurveData::Nurbs { transform, .. } => transform,
        }
    }

    /// Builds the algorithm for this record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid for its kind (for example a
    /// malformed knot vector).
    pub fn algorithm(&self) -> Result<Box<dyn CurveAlgorithm>> {
        default_factory(self.kind())(self)
    }
}

/// Evaluator bound to one [`CurveData`] record.
///
/// `d(u, 0)` is the position vector, so `p(u)` and `d(u, 0)` agree exactly.
pub trait CurveAlgorithm: std::fmt::Debug {
    /// Returns the kind of curve this algorithm evaluates.
    fn kind(&self) -> CurveKind;

    /// Returns the placement of the curve.
    fn transform(&self) -> &Transform;

    /// Returns the natural parameter domain.
    fn domain(&self) -> CurveDomain;

    /// Whether the domain can be sampled without an explicit range.
    fn is_bounded(&self) -> bool {
        self.domain().is_finite()
    }

    /// Number of uniform samples that resolve this curve's features when it
    /// is the sampled side of an intersection.
    fn segments_hint(&self) -> usize;

    /// The `order`-th derivative at `u`; order 0 is the position vector.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedDerivativeOrder`] if the kind has
    /// no closed form for `order`.
    fn d(&self, u: f64, order: usize) -> Result<Vector3>;

    /// Parameter of `point`.
    ///
    /// The point is not checked against the curve: for a point off the curve
    /// the result is meaningless. Validate with [`CurveAlgorithm::g`] first
    /// when the input is not known to lie on the curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the inversion itself fails numerically.
    fn u(&self, point: &Point3) -> Result<f64>;

    /// Value of the implicit equation in the curve's local plane; zero on
    /// the curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation fails numerically.
    fn g(&self, point: &Point3) -> Result<f64>;

    /// Point at `u`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn p(&self, u: f64) -> Result<Point3> {
        Ok(Point3::from(self.d(u, 0)?))
    }

    /// Unit tangent at `u`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] where the first derivative vanishes.
    fn tg(&self, u: f64) -> Result<Vector3> {
        let d1 = self.d(u, 1)?;
        let len = d1.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d1 / len)
    }

    /// Second derivative at `u`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn n(&self, u: f64) -> Result<Vector3> {
        self.d(u, 2)
    }

    /// Curvature at `u`.
    ///
    /// Uses `|d1 x d2| / |d1|^3`, valid for any parameterization, not only
    /// unit-speed ones.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] where the first derivative vanishes.
    fn k(&self, u: f64) -> Result<f64> {
        let d1 = self.d(u, 1)?;
        let d2 = self.d(u, 2)?;
        let speed = d1.norm();
        if speed < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d1.cross(&d2).norm() / speed.powi(3))
    }

    /// Radius of curvature at `u`; infinite where the curve is straight.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] where the first derivative vanishes.
    fn r(&self, u: f64) -> Result<f64> {
        let k = self.k(u)?;
        Ok(if k <= f64::MIN_POSITIVE {
            f64::INFINITY
        } else {
            1.0 / k
        })
    }

    /// Unit tangent and unit normal at `u`.
    ///
    /// The normal is the part of the second derivative orthogonal to the
    /// tangent; on straight stretches it falls back to the in-plane
    /// perpendicular `z_local x t`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if no normal can be formed.
    fn tn(&self, u: f64) -> Result<(Vector3, Vector3)> {
        let t = self.tg(u)?;
        let d2 = self.d(u, 2)?;
        let along = d2 - t * d2.dot(&t);
        if along.norm() > TOLERANCE {
            return Ok((t, along.normalize()));
        }
        let perp = self.transform().z_axis().cross(&t);
        let len = perp.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok((t, perp / len))
    }

    /// Orthonormal frame at `u` with columns tangent, normal, binormal.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if no normal can be formed.
    fn tbn(&self, u: f64) -> Result<Matrix3> {
        let (t, n) = self.tn(u)?;
        Ok(Matrix3::from_columns(&[t, n, t.cross(&n)]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn samples() -> Vec<CurveData> {
        let b = Point3::new(1.0, -2.0, 0.0);
        vec![
            CurveBuilder::line_from_begin_end(&b, &Point3::new(4.0, 2.0, 0.0)).unwrap(),
            CurveBuilder::circle_from_center_radius(&b, 2.5).unwrap(),
            CurveBuilder::ellipse_from_center_begin_end(
                &b,
                &Point3::new(4.0, -2.0, 0.0),
                &Point3::new(1.0, 0.0, 0.0),
            )
            .unwrap(),
            CurveBuilder::hyperbola_from_center_ab(
                &b,
                &Point3::new(3.0, -2.0, 0.0),
                &Point3::new(3.0, -1.0, 0.0),
            )
            .unwrap(),
            CurveBuilder::parabola_from_center_focus(&b, &Point3::new(1.0, -1.0, 0.0)).unwrap(),
            CurveBuilder::nurbs_from_points(
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    Point3::new(2.0, 0.5, 0.0),
                    Point3::new(3.0, 2.0, 0.0),
                ],
                3,
            )
            .unwrap(),
        ]
    }

    fn interior(alg: &dyn CurveAlgorithm) -> Vec<f64> {
        let dom = if alg.is_bounded() {
            alg.domain()
        } else {
            CurveDomain::new(-1.0, 1.0)
        };
        (1..8).map(|i| dom.lerp(f64::from(i) / 8.0)).collect()
    }

    #[test]
    fn position_is_zeroth_derivative() {
        for data in samples() {
            let alg = data.algorithm().unwrap();
            for u in interior(alg.as_ref()) {
                let p = alg.p(u).unwrap();
                assert_eq!(p.coords, alg.d(u, 0).unwrap());
            }
        }
    }

    #[test]
    fn tangent_has_unit_length() {
        for data in samples() {
            let alg = data.algorithm().unwrap();
            for u in interior(alg.as_ref()) {
                assert_relative_eq!(alg.tg(u).unwrap().norm(), 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn points_satisfy_implicit_equation() {
        for data in samples() {
            let alg = data.algorithm().unwrap();
            for u in interior(alg.as_ref()) {
                let g = alg.g(&alg.p(u).unwrap()).unwrap();
                assert!(g.abs() < 1e-8, "{:?} g = {g} at {u}", data.kind());
            }
        }
    }

    #[test]
    fn frames_are_orthonormal() {
        for data in samples() {
            let alg = data.algorithm().unwrap();
            for u in interior(alg.as_ref()) {
                let f = alg.tbn(u).unwrap();
                assert_relative_eq!(f.transpose() * f, Matrix3::identity(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn curvature_ignores_parameter_speed() {
        // Ellipse (2 cos u, sin u): a / b^2 at the vertex, b / a^2 at the co-vertex.
        let e = CurveBuilder::ellipse_from_center_begin_end(
            &Point3::origin(),
            &Point3::new(2.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let alg = e.algorithm().unwrap();
        assert_relative_eq!(alg.k(0.0).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(alg.k(PI / 2.0).unwrap(), 0.25, epsilon = 1e-12);

        // Parabola (f u^2, 2 f u) has speed 2f at its vertex and curvature 1 / 2f.
        let p =
            CurveBuilder::parabola_from_center_focus(&Point3::origin(), &Point3::new(1.5, 0.0, 0.0))
                .unwrap();
        assert_relative_eq!(p.algorithm().unwrap().k(0.0).unwrap(), 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn circle_curvature_is_inverse_radius() {
        let c = CurveBuilder::circle_from_center_radius(&Point3::origin(), 4.0).unwrap();
        let alg = c.algorithm().unwrap();
        assert_relative_eq!(alg.k(0.3).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(alg.r(1.7).unwrap(), 4.0, epsilon = 1e-12);
        // Normal points at the center.
        let (_, n) = alg.tn(PI / 2.0).unwrap();
        assert_relative_eq!(n, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn straight_line_has_infinite_radius() {
        let l = CurveBuilder::line_from_begin_end(&Point3::origin(), &Point3::new(1.0, 1.0, 0.0))
            .unwrap();
        let alg = l.algorithm().unwrap();
        assert_eq!(alg.k(0.5).unwrap(), 0.0);
        assert!(alg.r(0.5).unwrap().is_infinite());
        let (t, n) = alg.tn(0.5).unwrap();
        assert_relative_eq!(t.dot(&n), 0.0, epsilon = 1e-12);
        assert_relative_eq!(n.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn domain_helpers() {
        let d = CurveDomain::new(2.0, 6.0);
        assert!(d.is_finite());
        assert_relative_eq!(d.width(), 4.0);
        assert_relative_eq!(d.lerp(0.25), 3.0);
        assert!(!CurveDomain::new(f64::NEG_INFINITY, 0.0).is_finite());
    }
}
