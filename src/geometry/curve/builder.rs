use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::math::{flatten, Point3, Transform, Vector3, TOLERANCE};
use super::nurbs::interpolate;
use super::{CurveData, NurbsAlgorithm};

/// Factory for [`CurveData`] records.
///
/// Every builder validates its input and returns a fresh immutable record;
/// share it through a `TopologyStore` handle to reuse it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveBuilder;

impl CurveBuilder {
    /// Line from `begin` to `end`, parameterized by arc length.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the points coincide.
    pub fn line_from_begin_end(begin: &Point3, end: &Point3) -> Result<CurveData> {
        let delta = end - begin;
        let length = delta.norm();
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate("line endpoints coincide".into()).into());
        }
        let transform = Transform::aligned(*begin, &delta)?;
        Ok(CurveData::Line { transform, length })
    }

    /// Circle of `radius` centered at `center`, with `u = 0` on world `+X`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a radius below tolerance.
    pub fn circle_from_center_radius(center: &Point3, radius: f64) -> Result<CurveData> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate(format!("circle radius {radius}")).into());
        }
        Ok(CurveData::Arc {
            transform: Transform::planar(*center, 0.0),
            radius_x: radius,
            radius_y: radius,
        })
    }

    /// Circle centered at `center` passing through `begin`, with `u = 0` at
    /// `begin`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the points coincide.
    pub fn circle_from_center_begin(center: &Point3, begin: &Point3) -> Result<CurveData> {
        let to_begin = begin - center;
        let radius = to_begin.norm();
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("circle center on its begin point".into()).into());
        }
        Ok(CurveData::Arc {
            transform: Transform::aligned(*center, &to_begin)?,
            radius_x: radius,
            radius_y: radius,
        })
    }

    /// Circle through three points in the XY plane, with `u = 0` at `begin`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the points are collinear.
    pub fn circle_from_three_points(
        begin: &Point3,
        mid: &Point3,
        end: &Point3,
    ) -> Result<CurveData> {
        let (x1, y1) = (begin.x, begin.y);
        let (x2, y2) = (mid.x, mid.y);
        let (x3, y3) = (end.x, end.y);
        let d = 2.0 * (x1 * (y2 - y3) + x2 * (y3 - y1) + x3 * (y1 - y2));
        if d.abs() < TOLERANCE {
            return Err(
                GeometryError::Degenerate("three circle points are collinear".into()).into(),
            );
        }
        let s1 = x1 * x1 + y1 * y1;
        let s2 = x2 * x2 + y2 * y2;
        let s3 = x3 * x3 + y3 * y3;
        let cx = (s1 * (y2 - y3) + s2 * (y3 - y1) + s3 * (y1 - y2)) / d;
        let cy = (s1 * (x3 - x2) + s2 * (x1 - x3) + s3 * (x2 - x1)) / d;
        let center = flatten(&Point3::new(cx, cy, 0.0), begin.z);
        trace!(?center, "circle through three points");
        Self::circle_from_center_begin(&center, begin)
    }

    /// Ellipse centered at `center` with its major axis through `begin`; the
    /// minor radius is the distance of `end` from the major axis.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if either radius vanishes.
    pub fn ellipse_from_center_begin_end(
        center: &Point3,
        begin: &Point3,
        end: &Point3,
    ) -> Result<CurveData> {
        let (transform, radius_x, radius_y) = conic_frame(center, begin, end, "ellipse")?;
        Ok(CurveData::Arc {
            transform,
            radius_x,
            radius_y,
        })
    }

    /// Hyperbola centered at `center` with its vertex at `vertex`; the
    /// imaginary semi-axis is the distance of `b` from the transverse axis.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if either semi-axis vanishes.
    pub fn hyperbola_from_center_ab(
        center: &Point3,
        vertex: &Point3,
        b: &Point3,
    ) -> Result<CurveData> {
        let (transform, radius_x, radius_y) = conic_frame(center, vertex, b, "hyperbola")?;
        Ok(CurveData::Hyperbola {
            transform,
            radius_x,
            radius_y,
        })
    }

    /// Parabola with its vertex at `vertex`, opening toward `focus`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the points coincide.
    pub fn parabola_from_center_focus(vertex: &Point3, focus: &Point3) -> Result<CurveData> {
        let axis = focus - vertex;
        let f = axis.norm();
        if f < TOLERANCE {
            return Err(GeometryError::Degenerate("parabola focus on its vertex".into()).into());
        }
        Ok(CurveData::Parabola {
            transform: Transform::aligned(*vertex, &axis)?,
            focus: f,
        })
    }

    /// NURBS curve from explicit data.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidNurbs`] if the knots, controls and
    /// weights do not form a valid curve.
    pub fn nurbs(
        transform: Transform,
        controls: Vec<Point3>,
        knots: Vec<f64>,
        degree: usize,
        weights: Option<Vec<f64>>,
    ) -> Result<CurveData> {
        NurbsAlgorithm::new(transform, &controls, &knots, degree, weights.as_deref())?;
        Ok(CurveData::Nurbs {
            transform,
            controls,
            knots,
            degree,
            weights,
        })
    }

    /// Non-rational NURBS curve of `degree` interpolating `points`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points cannot be interpolated.
    pub fn nurbs_from_points(points: &[Point3], degree: usize) -> Result<CurveData> {
        let (knots, controls) = interpolate(points, degree)?;
        Self::nurbs(Transform::identity(), controls, knots, degree, None)
    }
}

/// Frame and semi-axes of a central conic from its center, a point on the
/// principal axis and a point fixing the secondary radius.
fn conic_frame(
    center: &Point3,
    on_axis: &Point3,
    off_axis: &Point3,
    what: &str,
) -> Result<(Transform, f64, f64)> {
    let axis: Vector3 = on_axis - center;
    let radius_x = axis.norm();
    if radius_x < TOLERANCE {
        return Err(GeometryError::Degenerate(format!("{what} principal radius vanishes")).into());
    }
    let unit = axis / radius_x;
    let rel = off_axis - center;
    let radius_y = (rel - unit * rel.dot(&unit)).norm();
    if radius_y < TOLERANCE {
        return Err(GeometryError::Degenerate(format!("{what} secondary radius vanishes")).into());
    }
    Ok((Transform::aligned(*center, &axis)?, radius_x, radius_y))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::CurveKind;
    use approx::assert_relative_eq;

    #[test]
    fn line_spans_its_endpoints() {
        let b = Point3::new(1.0, 2.0, 0.0);
        let e = Point3::new(4.0, 6.0, 0.0);
        let data = CurveBuilder::line_from_begin_end(&b, &e).unwrap();
        let CurveData::Line { length, .. } = data else {
            panic!("expected a line");
        };
        assert_relative_eq!(length, 5.0);
        let alg = data.algorithm().unwrap();
        assert_relative_eq!(alg.p(length).unwrap(), e, epsilon = 1e-12);
    }

    #[test]
    fn coincident_line_points_are_degenerate() {
        let p = Point3::new(1.0, 1.0, 0.0);
        assert!(CurveBuilder::line_from_begin_end(&p, &p).is_err());
    }

    #[test]
    fn circle_from_begin_starts_at_begin() {
        let c = Point3::new(1.0, 1.0, 0.0);
        let b = Point3::new(1.0, 4.0, 0.0);
        let alg = CurveBuilder::circle_from_center_begin(&c, &b)
            .unwrap()
            .algorithm()
            .unwrap();
        assert_relative_eq!(alg.p(0.0).unwrap(), b, epsilon = 1e-12);
        assert_relative_eq!(alg.u(&b).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn circle_through_three_points() {
        let b = Point3::new(1.0, 0.0, 0.0);
        let m = Point3::new(0.0, 1.0, 0.0);
        let e = Point3::new(-1.0, 0.0, 0.0);
        let data = CurveBuilder::circle_from_three_points(&b, &m, &e).unwrap();
        let CurveData::Arc {
            transform,
            radius_x,
            radius_y,
        } = &data
        else {
            panic!("expected an arc");
        };
        assert_relative_eq!(*transform.position(), Point3::origin(), epsilon = 1e-12);
        assert_relative_eq!(*radius_x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(*radius_y, 1.0, epsilon = 1e-12);
        let alg = data.algorithm().unwrap();
        assert_relative_eq!(alg.p(0.0).unwrap(), b, epsilon = 1e-12);
        assert!(alg.g(&m).unwrap().abs() < 1e-12);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let r = CurveBuilder::circle_from_three_points(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
            &Point3::new(2.0, 2.0, 0.0),
        );
        assert!(matches!(
            r,
            Err(crate::error::KernelError::Geometry(GeometryError::Degenerate(_)))
        ));
    }

    #[test]
    fn ellipse_radii_from_points() {
        let data = CurveBuilder::ellipse_from_center_begin_end(
            &Point3::origin(),
            &Point3::new(0.0, 3.0, 0.0),
            &Point3::new(2.0, 1.0, 0.0),
        )
        .unwrap();
        let CurveData::Arc {
            radius_x, radius_y, ..
        } = data
        else {
            panic!("expected an arc");
        };
        assert_relative_eq!(radius_x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(radius_y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn parabola_vertex_and_focus() {
        let v = Point3::new(1.0, 1.0, 0.0);
        let data =
            CurveBuilder::parabola_from_center_focus(&v, &Point3::new(1.0, 3.0, 0.0)).unwrap();
        let alg = data.algorithm().unwrap();
        assert_eq!(alg.kind(), CurveKind::Parabola);
        assert_relative_eq!(alg.p(0.0).unwrap(), v, epsilon = 1e-12);
        // Opens toward +Y: at u = 1 the point is (f u^2, 2 f u) = (2, 4) locally.
        assert_relative_eq!(alg.p(1.0).unwrap(), Point3::new(-3.0, 3.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn invalid_nurbs_is_rejected() {
        let r = CurveBuilder::nurbs(
            Transform::identity(),
            vec![Point3::origin(); 2],
            vec![0.0, 0.0, 1.0],
            1,
            None,
        );
        assert!(r.is_err());
    }
}
