use tracing::{trace, warn};

use crate::error::{GeometryError, Result};
use crate::geometry::curve::{CurveAlgorithm, CurveDomain, CurveKind};

use super::{IntersectParams, IntersectionPoint};

/// Largest residual accepted for a root against a signed-distance
/// pseudo-implicit. Its sign can jump where the closest point switches
/// between distant parts of the curve; such jumps bisect to a point far
/// from the curve and are dropped.
const PSEUDO_IMPLICIT_RESIDUAL: f64 = 1e-6;

/// Samples `sampled` over `range` (or its own domain) and finds where the
/// implicit equation of `implicit` changes sign.
///
/// `u0` of each result is on `sampled` and `u1` on `implicit`; results
/// ascend by `u0`.
///
/// # Errors
///
/// Returns [`GeometryError::UnboundedDomain`] if `range` is `None` and the
/// sampled curve is unbounded, or any evaluation error.
#[allow(clippy::float_cmp)]
pub fn curve_x_curve(
    sampled: &dyn CurveAlgorithm,
    implicit: &dyn CurveAlgorithm,
    range: Option<CurveDomain>,
    params: &IntersectParams,
) -> Result<Vec<IntersectionPoint>> {
    let range = match range {
        Some(range) => range,
        None if sampled.is_bounded() => sampled.domain(),
        None => return Err(GeometryError::UnboundedDomain.into()),
    };
    let (lo, hi) = (range.t_min.min(range.t_max), range.t_min.max(range.t_max));
    let segments = params
        .segments
        .unwrap_or_else(|| sampled.segments_hint())
        .max(1);
    let g = |u: f64| -> Result<f64> { implicit.g(&sampled.p(u)?) };

    let mut roots = Vec::new();
    let mut prev_u = lo;
    let mut prev_g = g(lo)?;
    if prev_g == 0.0 {
        roots.push(prev_u);
    }
    for i in 1..=segments {
        #[allow(clippy::cast_precision_loss)]
        let u = lo + (hi - lo) * i as f64 / segments as f64;
        let gu = g(u)?;
        if gu == 0.0 {
            roots.push(u);
        } else if prev_g * gu < 0.0 {
            roots.push(bisect(&g, prev_u, prev_g, u, params)?);
        }
        prev_u = u;
        prev_g = gu;
    }

    let pseudo = implicit.kind() == CurveKind::Nurbs;
    let mut hits = Vec::with_capacity(roots.len());
    for u in roots {
        let point = sampled.p(u)?;
        if pseudo && implicit.g(&point)?.abs() > PSEUDO_IMPLICIT_RESIDUAL {
            trace!(u, "dropping sign jump of signed distance");
            continue;
        }
        let hit = IntersectionPoint {
            point,
            u0: u,
            u1: implicit.u(&point)?,
        };
        trace!(point = ?hit.point, u0 = hit.u0, u1 = hit.u1, "curve/curve root");
        hits.push(hit);
    }
    Ok(hits)
}

/// Narrows a sign-change bracket `[a, b]` with `g(a) = ga`.
///
/// Stops when the bracket is no wider than the tolerance, when the midpoint
/// can no longer be told apart from an end, or when `g` vanishes exactly;
/// returns the final midpoint.
#[allow(clippy::float_cmp)]
fn bisect<G>(g: &G, mut a: f64, mut ga: f64, mut b: f64, params: &IntersectParams) -> Result<f64>
where
    G: Fn(f64) -> Result<f64>,
{
    for _ in 0..params.max_depth {
        let mid = 0.5 * (a + b);
        if (b - a).abs() <= params.tolerance || mid == a || mid == b {
            return Ok(mid);
        }
        let gm = g(mid)?;
        if gm == 0.0 {
            return Ok(mid);
        }
        if ga * gm < 0.0 {
            b = mid;
        } else {
            a = mid;
            ga = gm;
        }
    }
    warn!(
        max_depth = params.max_depth,
        width = (b - a).abs(),
        "bisection depth reached before tolerance"
    );
    Ok(0.5 * (a + b))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::CurveBuilder;
    use crate::math::Point3;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn bisection_finds_square_root() {
        let g = |u: f64| -> Result<f64> { Ok(u * u - 2.0) };
        let root = bisect(&g, 0.0, -2.0, 2.0, &IntersectParams::default()).unwrap();
        assert_relative_eq!(root, 2.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn shallow_depth_returns_coarse_midpoint() {
        let g = |u: f64| -> Result<f64> { Ok(u - 0.3) };
        let params = IntersectParams {
            max_depth: 1,
            ..IntersectParams::default()
        };
        let root = bisect(&g, 0.0, -0.3, 1.0, &params).unwrap();
        assert_relative_eq!(root, 0.25);
    }

    #[test]
    fn root_on_a_sample_is_found_once() {
        // With four segments over [0, 8] a sample lands on the crossing.
        let line = CurveBuilder::line_from_begin_end(&Point3::origin(), &Point3::new(8.0, 0.0, 0.0))
            .unwrap()
            .algorithm()
            .unwrap();
        let wall = CurveBuilder::line_from_begin_end(
            &Point3::new(4.0, -1.0, 0.0),
            &Point3::new(4.0, 1.0, 0.0),
        )
        .unwrap()
        .algorithm()
        .unwrap();
        let params = IntersectParams {
            segments: Some(4),
            ..IntersectParams::default()
        };
        let hits = curve_x_curve(line.as_ref(), wall.as_ref(), None, &params).unwrap();
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].u0, 4.0, epsilon = 1e-9);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn explicit_range_limits_sampling() {
        let circle = CurveBuilder::circle_from_center_radius(&Point3::origin(), 1.0)
            .unwrap()
            .algorithm()
            .unwrap();
        let axis = CurveBuilder::line_from_begin_end(
            &Point3::new(-2.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
        )
        .unwrap()
        .algorithm()
        .unwrap();
        let all =
            curve_x_curve(circle.as_ref(), axis.as_ref(), None, &IntersectParams::default())
                .unwrap();
        // u = 0 is a sample with g exactly zero. The float sine is positive at
        // the pi sample and negative at 2pi, so only the crossing past pi is
        // bracketed and the domain end adds nothing.
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].u0, 0.0);
        assert_eq!(all[0].point, Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(all[0].u1, 3.0, epsilon = 1e-12);
        assert_relative_eq!(all[1].u0, PI, epsilon = 1e-9);
        assert_relative_eq!(all[1].point, Point3::new(-1.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(all[1].u1, 1.0, epsilon = 1e-9);

        let upper = curve_x_curve(
            circle.as_ref(),
            axis.as_ref(),
            Some(CurveDomain::new(0.5, 3.0)),
            &IntersectParams::default(),
        )
        .unwrap();
        assert!(upper.is_empty());
    }
}
