//! Curve/curve intersection.
//!
//! Two lines meet in closed form. Every other pair is solved by sampling
//! one curve and watching the sign of the other curve's implicit equation
//! along it; each sign change is refined by bisection.

mod curve_curve;
mod line_line;

pub use curve_curve::curve_x_curve;
pub use line_line::line_x_line;

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::{CurveAlgorithm, CurveDomain, CurveKind};
use crate::math::{Point3, TOLERANCE};

/// A point shared by two curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPoint {
    /// The intersection point.
    pub point: Point3,
    /// Parameter on the first curve.
    pub u0: f64,
    /// Parameter on the second curve.
    pub u1: f64,
}

/// Parameters controlling curve/curve intersection.
#[derive(Debug, Clone, Copy)]
pub struct IntersectParams {
    /// Bisection stops once the bracket is at most this wide. Also the
    /// determinant below which two lines count as parallel.
    pub tolerance: f64,
    /// Uniform sample count; `None` uses the sampled curve's own hint.
    pub segments: Option<usize>,
    /// Maximum bisection steps per root.
    pub max_depth: usize,
    /// Parameter range of the first curve, used if it ends up sampled.
    pub range0: Option<CurveDomain>,
    /// Parameter range of the second curve, used if it ends up sampled.
    pub range1: Option<CurveDomain>,
}

impl Default for IntersectParams {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            segments: None,
            max_depth: 64,
            range0: None,
            range1: None,
        }
    }
}

/// Intersects two curves, picking the method from their kinds.
///
/// Line/line is solved in closed form. Otherwise the more complex curve that
/// has a true implicit equation is evaluated implicitly and the other one is
/// sampled; when both are NURBS the second uses its signed-distance
/// pseudo-implicit. Results ascend along the sampled curve; `u0` always
/// refers to `c0`.
///
/// Tangential contacts (no sign change) are not found, and roots closer
/// together than one sample step may be missed or reported twice.
///
/// # Errors
///
/// Returns [`GeometryError::UnboundedDomain`] if the sampled curve is
/// unbounded and has no range in `params`, or any evaluation error.
pub fn intersect(
    c0: &dyn CurveAlgorithm,
    c1: &dyn CurveAlgorithm,
    params: &IntersectParams,
) -> Result<Vec<IntersectionPoint>> {
    let (k0, k1) = (c0.kind(), c1.kind());
    if k0 == CurveKind::Line && k1 == CurveKind::Line {
        debug!("line/line intersection in closed form");
        return line_x_line(c0, c1, params.tolerance);
    }

    if implicit_is_first(k0, k1) {
        debug!(sampled = ?k1, implicit = ?k0, "sampling second curve");
        let roots = curve_x_curve(c1, c0, params.range1, params)?;
        Ok(roots
            .into_iter()
            .map(|r| IntersectionPoint {
                point: r.point,
                u0: r.u1,
                u1: r.u0,
            })
            .collect())
    } else {
        debug!(sampled = ?k0, implicit = ?k1, "sampling first curve");
        curve_x_curve(c0, c1, params.range0, params)
    }
}

/// Whether the first curve should be the implicit side.
fn implicit_is_first(k0: CurveKind, k1: CurveKind) -> bool {
    match (k0.has_implicit(), k1.has_implicit()) {
        (true, true) => k0.complexity() > k1.complexity(),
        (true, false) => true,
        // Neither or only the second: the second is implicit (or
        // pseudo-implicit when both are NURBS).
        _ => false,
    }
}

fn expect_kinds(
    c0: &dyn CurveAlgorithm,
    c1: &dyn CurveAlgorithm,
    k0: CurveKind,
    k1: CurveKind,
) -> Result<()> {
    if c0.kind() != k0 {
        return Err(GeometryError::UnsupportedCurveType(c0.kind()).into());
    }
    if c1.kind() != k1 {
        return Err(GeometryError::UnsupportedCurveType(c1.kind()).into());
    }
    Ok(())
}

/// Intersects a line with an arc.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedCurveType`] if the kinds do not match.
pub fn line_x_arc(
    line: &dyn CurveAlgorithm,
    arc: &dyn CurveAlgorithm,
    params: &IntersectParams,
) -> Result<Vec<IntersectionPoint>> {
    expect_kinds(line, arc, CurveKind::Line, CurveKind::Arc)?;
    intersect(line, arc, params)
}

/// Intersects two arcs.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedCurveType`] if the kinds do not match.
pub fn arc_x_arc(
    a: &dyn CurveAlgorithm,
    b: &dyn CurveAlgorithm,
    params: &IntersectParams,
) -> Result<Vec<IntersectionPoint>> {
    expect_kinds(a, b, CurveKind::Arc, CurveKind::Arc)?;
    intersect(a, b, params)
}

/// Intersects a line with a NURBS curve.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedCurveType`] if the kinds do not match.
pub fn line_x_nurbs(
    line: &dyn CurveAlgorithm,
    nurbs: &dyn CurveAlgorithm,
    params: &IntersectParams,
) -> Result<Vec<IntersectionPoint>> {
    expect_kinds(line, nurbs, CurveKind::Line, CurveKind::Nurbs)?;
    intersect(line, nurbs, params)
}

/// Intersects an arc with a NURBS curve.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedCurveType`] if the kinds do not match.
pub fn arc_x_nurbs(
    arc: &dyn CurveAlgorithm,
    nurbs: &dyn CurveAlgorithm,
    params: &IntersectParams,
) -> Result<Vec<IntersectionPoint>> {
    expect_kinds(arc, nurbs, CurveKind::Arc, CurveKind::Nurbs)?;
    intersect(arc, nurbs, params)
}

/// Intersects two NURBS curves; the second acts through its signed distance.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedCurveType`] if the kinds do not match.
pub fn nurbs_x_nurbs(
    a: &dyn CurveAlgorithm,
    b: &dyn CurveAlgorithm,
    params: &IntersectParams,
) -> Result<Vec<IntersectionPoint>> {
    expect_kinds(a, b, CurveKind::Nurbs, CurveKind::Nurbs)?;
    intersect(a, b, params)
}
