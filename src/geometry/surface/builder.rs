use std::f64::consts::FRAC_PI_2;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::CurveData;
use crate::math::{Point3, Rotation, Transform, Vector3, TOLERANCE};
use super::{NurbsSurfaceAlgorithm, SurfaceData};

/// Factory for [`SurfaceData`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceBuilder;

impl SurfaceBuilder {
    /// The local XY plane of `transform`.
    #[must_use]
    pub fn plane(transform: Transform) -> SurfaceData {
        SurfaceData::Plane { transform }
    }

    /// Plane through `point` with the given normal.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for a zero normal.
    pub fn plane_from_point_normal(point: &Point3, normal: &Vector3) -> Result<SurfaceData> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let rotation = Rotation::rotation_between(&Vector3::z(), &(normal / len))
            .unwrap_or_else(|| Rotation::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI));
        Ok(SurfaceData::Plane {
            transform: Transform::new(*point, rotation),
        })
    }

    /// Cylinder of `radius` around the local `Z` axis of `transform`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a radius below tolerance.
    pub fn cylinder(transform: Transform, radius: f64) -> Result<SurfaceData> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }
        Ok(SurfaceData::Cylinder { transform, radius })
    }

    /// Cone around the local `Z` axis with `radius` at `v = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a negative radius or a
    /// half-angle outside `(0, pi/2)`.
    pub fn cone(transform: Transform, radius: f64, half_angle: f64) -> Result<SurfaceData> {
        if radius < 0.0 {
            return Err(GeometryError::Degenerate("cone radius must not be negative".into()).into());
        }
        if !(half_angle > TOLERANCE && half_angle < FRAC_PI_2 - TOLERANCE) {
            return Err(GeometryError::Degenerate(format!("cone half-angle {half_angle}")).into());
        }
        Ok(SurfaceData::Cone {
            transform,
            radius,
            half_angle,
        })
    }

    /// Sphere of `radius` centered at `center`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a radius below tolerance.
    pub fn sphere_from_center_radius(center: &Point3, radius: f64) -> Result<SurfaceData> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("sphere radius must be positive".into()).into());
        }
        Ok(SurfaceData::Sphere {
            transform: Transform::planar(*center, 0.0),
            radius,
        })
    }

    /// Lofting through `sections`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for fewer than two sections and
    /// [`GeometryError::UnboundedDomain`] for a section without a finite
    /// domain.
    pub fn lofting(sections: Vec<CurveData>) -> Result<SurfaceData> {
        let data = SurfaceData::Lofting {
            transform: Transform::identity(),
            sections,
        };
        data.algorithm()?;
        Ok(data)
    }

    /// Translational sweep of `profile` along `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnboundedDomain`] if the path is unbounded.
    pub fn sweep(profile: CurveData, path: CurveData) -> Result<SurfaceData> {
        let data = SurfaceData::Sweep {
            transform: Transform::identity(),
            profile: Box::new(profile),
            path: Box::new(path),
        };
        data.algorithm()?;
        Ok(data)
    }

    /// NURBS surface from explicit data.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidNurbs`] if the data does not form a
    /// valid surface.
    #[allow(clippy::too_many_arguments)]
    pub fn nurbs_surface(
        transform: Transform,
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        controls: Vec<Vec<Point3>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Result<SurfaceData> {
        NurbsSurfaceAlgorithm::new(
            transform,
            degree_u,
            degree_v,
            &knots_u,
            &knots_v,
            &controls,
            weights.as_deref(),
        )?;
        Ok(SurfaceData::Nurbs {
            transform,
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            controls,
            weights,
        })
    }
}
