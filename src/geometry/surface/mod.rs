mod builder;
mod cone;
mod cylinder;
mod lofting;
mod nurbs;
mod plane;
mod sphere;
mod sweep;

pub use builder::SurfaceBuilder;
pub use cone::ConeAlgorithm;
pub use cylinder::CylinderAlgorithm;
pub use lofting::LoftingAlgorithm;
pub use nurbs::NurbsSurfaceAlgorithm;
pub use plane::PlaneAlgorithm;
pub use sphere::SphereAlgorithm;
pub use sweep::SweepAlgorithm;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::CurveData;
use crate::math::{Point3, Transform, Vector3, TOLERANCE};

/// Parameter domain for a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDomain {
    /// Start of the U parameter range.
    pub u_min: f64,
    /// End of the U parameter range.
    pub u_max: f64,
    /// Start of the V parameter range.
    pub v_min: f64,
    /// End of the V parameter range.
    pub v_max: f64,
}

impl SurfaceDomain {
    /// Creates a new surface domain.
    #[must_use]
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }
}

/// Tag of a [`SurfaceData`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Plane,
    Cylinder,
    Cone,
    Sphere,
    Lofting,
    Sweep,
    Nurbs,
}

/// Immutable definition of a surface, placed by a [`Transform`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceData {
    /// `(u, v, 0)`.
    Plane { transform: Transform },
    /// `(r cos u, r sin u, v)`.
    Cylinder { transform: Transform, radius: f64 },
    /// `((r + v tan a) cos u, (r + v tan a) sin u, v)`.
    Cone {
        transform: Transform,
        radius: f64,
        half_angle: f64,
    },
    /// `(r cos v cos u, r cos v sin u, r sin v)`.
    Sphere { transform: Transform, radius: f64 },
    /// Piecewise-linear blend between consecutive section curves.
    Lofting {
        transform: Transform,
        sections: Vec<CurveData>,
    },
    /// Translational sweep of `profile` along `path`.
    Sweep {
        transform: Transform,
        profile: Box<CurveData>,
        path: Box<CurveData>,
    },
    /// Tensor-product NURBS with controls in local coordinates.
    Nurbs {
        transform: Transform,
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        controls: Vec<Vec<Point3>>,
        weights: Option<Vec<Vec<f64>>>,
    },
}

impl SurfaceData {
    /// Returns the variant tag.
    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        match self {
            SurfaceData::Plane { .. } => SurfaceKind::Plane,
            SurfaceData::Cylinder { .. } => SurfaceKind::Cylinder,
            SurfaceData::Cone { .. } => SurfaceKind::Cone,
            SurfaceData::Sphere { .. } => SurfaceKind::Sphere,
            SurfaceData::Lofting { .. } => SurfaceKind::Lofting,
            SurfaceData::Sweep { .. } => SurfaceKind::Sweep,
            SurfaceData::Nurbs { .. } => SurfaceKind::Nurbs,
        }
    }

    /// Returns the placement of the surface.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        match self {
            SurfaceData::Plane { transform }
            | SurfaceData::Cylinder { transform, .. }
            | SurfaceData::Cone { transform, .. }
            | SurfaceData::Sphere { transform, .. }
            | SurfaceData::Lofting { transform, .. }
            | SurfaceData::Sweep { transform, .. }
            | SurfaceData::Nurbs { transform, .. } => transform,
        }
    }

    /// Builds the algorithm for this record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid for its kind.
    pub fn algorithm(&self) -> Result<Box<dyn SurfaceAlgorithm>> {
        Ok(match self {
            SurfaceData::Plane { transform } => Box::new(PlaneAlgorithm::new(*transform)),
            SurfaceData::Cylinder { transform, radius } => {
                Box::new(CylinderAlgorithm::new(*transform, *radius))
            }
            SurfaceData::Cone {
                transform,
                radius,
                half_angle,
            } => Box::new(ConeAlgorithm::new(*transform, *radius, *half_angle)),
            SurfaceData::Sphere { transform, radius } => {
                Box::new(SphereAlgorithm::new(*transform, *radius))
            }
            SurfaceData::Lofting {
                transform,
                sections,
            } => Box::new(LoftingAlgorithm::new(*transform, sections)?),
            SurfaceData::Sweep {
                transform,
                profile,
                path,
            } => Box::new(SweepAlgorithm::new(*transform, profile, path)?),
            SurfaceData::Nurbs { .. } => Box::new(NurbsSurfaceAlgorithm::from_data(self)?),
        })
    }
}

/// Evaluator bound to one [`SurfaceData`] record.
pub trait SurfaceAlgorithm: std::fmt::Debug {
    /// Returns the kind of surface this algorithm evaluates.
    fn kind(&self) -> SurfaceKind;

    /// Returns the placement of the surface.
    fn transform(&self) -> &Transform;

    /// Returns the parameter domain.
    fn domain(&self) -> SurfaceDomain;

    /// Mixed partial derivative, `ru` times in `u` and `rv` times in `v`;
    /// order `(0, 0)` is the position vector.
    ///
    /// # Errors
    ///
    /// Returns an error if a section or profile curve fails to evaluate.
    fn d(&self, u: f64, v: f64, ru: usize, rv: usize) -> Result<Vector3>;

    /// Point at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn p(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(Point3::from(self.d(u, v, 0, 0)?))
    }

    /// Unit normal `du x dv` at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] at singular points such as a
    /// cone apex or a sphere pole.
    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        let n = self.d(u, v, 1, 0)?.cross(&self.d(u, v, 0, 1)?);
        let len = n.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(n / len)
    }

    /// Implicit equation value in the local frame; `None` for freeform kinds.
    fn g(&self, _point: &Point3) -> Option<f64> {
        None
    }

    /// Closed-form inverse; `None` for freeform kinds.
    fn uv(&self, _point: &Point3) -> Option<(f64, f64)> {
        None
    }
}

/// Values of the `n`-th derivatives of `cos` and `sin` at `t`.
pub(crate) fn trig_derivative(t: f64, n: usize) -> (f64, f64) {
    let (sin, cos) = t.sin_cos();
    match n % 4 {
        0 => (cos, sin),
        1 => (-sin, cos),
        2 => (-cos, -sin),
        _ => (sin, -cos),
    }
}

/// Places a local derivative in world space: the position is mapped as a
/// point, every higher order as a vector.
pub(crate) fn place(transform: &Transform, local: Vector3, ru: usize, rv: usize) -> Vector3 {
    if ru == 0 && rv == 0 {
        transform.point_to_world(&Point3::from(local)).coords
    } else {
        transform.vector_to_world(&local)
    }
}

/// Angle of `(x, y)` in `[0, 2pi)`.
pub(crate) fn polar_angle(x: f64, y: f64) -> f64 {
    let angle = y.atan2(x);
    if angle < 0.0 {
        angle + std::f64::consts::TAU
    } else {
        angle
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn analytic() -> Vec<SurfaceData> {
        let t = Transform::planar(Point3::new(1.0, 2.0, 3.0), 0.4);
        vec![
            SurfaceBuilder::plane(t),
            SurfaceBuilder::cylinder(t, 2.0).unwrap(),
            SurfaceBuilder::cone(t, 1.0, 0.3).unwrap(),
            SurfaceBuilder::sphere_from_center_radius(&Point3::new(1.0, 2.0, 3.0), 1.5).unwrap(),
        ]
    }

    #[test]
    fn analytic_points_satisfy_implicit_and_invert() {
        for data in analytic() {
            let alg = data.algorithm().unwrap();
            for (u, v) in [(0.3, 0.2), (2.0, -0.7), (4.5, 0.9)] {
                let p = alg.p(u, v).unwrap();
                let g = alg.g(&p).unwrap();
                assert!(g.abs() < 1e-9, "{:?}: g = {g}", data.kind());
                let (iu, iv) = alg.uv(&p).unwrap();
                assert_relative_eq!(alg.p(iu, iv).unwrap(), p, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn partials_match_finite_differences() {
        let step = 1e-6;
        for data in analytic() {
            let alg = data.algorithm().unwrap();
            let (u, v) = (0.8, 0.4);
            let du = (alg.d(u + step, v, 0, 0).unwrap() - alg.d(u - step, v, 0, 0).unwrap())
                / (2.0 * step);
            let dv = (alg.d(u, v + step, 0, 0).unwrap() - alg.d(u, v - step, 0, 0).unwrap())
                / (2.0 * step);
            assert_relative_eq!(alg.d(u, v, 1, 0).unwrap(), du, epsilon = 1e-6);
            assert_relative_eq!(alg.d(u, v, 0, 1).unwrap(), dv, epsilon = 1e-6);
        }
    }

    #[test]
    fn normals_are_unit_and_orthogonal() {
        for data in analytic() {
            let alg = data.algorithm().unwrap();
            let n = alg.normal(1.1, 0.3).unwrap();
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(n.dot(&alg.d(1.1, 0.3, 1, 0).unwrap()), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn trig_derivatives_cycle() {
        let t = 0.9;
        let (c0, s0) = trig_derivative(t, 0);
        let (c4, s4) = trig_derivative(t, 4);
        assert_relative_eq!(c0, c4);
        assert_relative_eq!(s0, s4);
        assert_relative_eq!(trig_derivative(t, 1).0, -t.sin());
    }

    #[test]
    fn polar_angle_is_non_negative() {
        assert_relative_eq!(polar_angle(0.0, -1.0), 1.5 * std::f64::consts::PI);
        assert_relative_eq!(polar_angle(1.0, 0.0), 0.0);
    }
}
