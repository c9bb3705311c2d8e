use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::{CurveAlgorithm, CurveKind, LineAlgorithm};
use crate::math::Point3;

use super::IntersectionPoint;

/// Intersects two lines in the XY plane by Cramer's rule.
///
/// Each line is written as `A x + B y + C = 0` with `A = -sin(angle)` and
/// `B = cos(angle)`. Lines are treated as infinite: the parameters are the
/// signed distances from each origin and may fall outside `[0, length]`.
/// Returns an empty vector when `|det| < tolerance` (parallel lines).
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedCurveType`] if either curve is not a
/// line.
pub fn line_x_line(
    c0: &dyn CurveAlgorithm,
    c1: &dyn CurveAlgorithm,
    tolerance: f64,
) -> Result<Vec<IntersectionPoint>> {
    for c in [c0, c1] {
        if c.kind() != CurveKind::Line {
            return Err(GeometryError::UnsupportedCurveType(c.kind()).into());
        }
    }
    let (a0, b0, k0) = as_line(c0).implicit_coefficients();
    let (a1, b1, k1) = as_line(c1).implicit_coefficients();

    let det = a0 * b1 - a1 * b0;
    if det.abs() < tolerance {
        trace!(det, "lines are parallel");
        return Ok(Vec::new());
    }
    let x = (-k0 * b1 + k1 * b0) / det;
    let y = (-a0 * k1 + a1 * k0) / det;
    let point = Point3::new(x, y, c0.transform().position().z);

    let hit = IntersectionPoint {
        point,
        u0: c0.u(&point)?,
        u1: c1.u(&point)?,
    };
    trace!(point = ?hit.point, u0 = hit.u0, u1 = hit.u1, "line/line root");
    Ok(vec![hit])
}

fn as_line(c: &dyn CurveAlgorithm) -> LineAlgorithm {
    LineAlgorithm::new(*c.transform(), c.domain().t_max)
}
