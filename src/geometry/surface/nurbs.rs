use curvo::prelude::NurbsSurface3D;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::{homogeneous, validate_knots};
use crate::math::{Point3, Transform, Vector3};

use super::{place, SurfaceAlgorithm, SurfaceData, SurfaceDomain, SurfaceKind};

/// A placed NURBS surface; evaluation delegates to a `curvo` surface.
///
/// `controls[i][j]` is the control point at index `i` along `u` and `j`
/// along `v`. Parameters outside the knot domain are clamped.
#[derive(Debug, Clone)]
pub struct NurbsSurfaceAlgorithm {
    transform: Transform,
    surface: NurbsSurface3D<f64>,
    domain: SurfaceDomain,
}

impl NurbsSurfaceAlgorithm {
    /// Creates an algorithm for a placed NURBS surface, validating both
    /// parametric directions.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidNurbs`] if the control grid is ragged,
    /// either knot vector does not fit its degree and control count, or the
    /// weight grid does not match the control grid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transform: Transform,
        degree_u: usize,
        degree_v: usize,
        knots_u: &[f64],
        knots_v: &[f64],
        controls: &[Vec<Point3>],
        weights: Option<&[Vec<f64>]>,
    ) -> Result<Self> {
        let rows = controls.len();
        let cols = controls.first().map_or(0, Vec::len);
        if controls.iter().any(|row| row.len() != cols) {
            return Err(GeometryError::InvalidNurbs("control grid is ragged".into()).into());
        }
        validate_knots(degree_u, knots_u, rows)?;
        validate_knots(degree_v, knots_v, cols)?;
        if let Some(w) = weights {
            if w.len() != rows || w.iter().any(|row| row.len() != cols) {
                return Err(GeometryError::InvalidNurbs(
                    "weight grid does not match control grid".into(),
                )
                .into());
            }
        }

        let grid = controls
            .iter()
            .enumerate()
            .map(|(i, row)| homogeneous(row, weights.map(|w| w[i].as_slice())))
            .collect::<Result<Vec<_>>>()?;
        let surface =
            NurbsSurface3D::new(degree_u, degree_v, knots_u.to_vec(), knots_v.to_vec(), grid);
        Ok(Self {
            transform,
            surface,
            domain: SurfaceDomain::new(
                knots_u[degree_u],
                knots_u[rows],
                knots_v[degree_v],
                knots_v[cols],
            ),
        })
    }

    /// Binds to a [`SurfaceData::Nurbs`] record.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidNurbs`] for a malformed record or any
    /// other surface kind.
    pub fn from_data(data: &SurfaceData) -> Result<Self> {
        let SurfaceData::Nurbs {
            transform,
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            controls,
            weights,
        } = data
        else {
            return Err(GeometryError::InvalidNurbs(format!(
                "{:?} is not a NURBS surface",
                data.kind()
            ))
            .into());
        };
        Self::new(
            *transform,
            *degree_u,
            *degree_v,
            knots_u,
            knots_v,
            controls,
            weights.as_deref(),
        )
    }

    /// Returns the underlying local-frame surface.
    #[must_use]
    pub fn surface(&self) -> &NurbsSurface3D<f64> {
        &self.surface
    }
}

impl SurfaceAlgorithm for NurbsSurfaceAlgorithm {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Nurbs
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> SurfaceDomain {
        self.domain
    }

    fn d(&self, u: f64, v: f64, ru: usize, rv: usize) -> Result<Vector3> {
        let u = u.clamp(self.domain.u_min, self.domain.u_max);
        let v = v.clamp(self.domain.v_min, self.domain.v_max);
        let skl = self.surface.rational_derivatives(u, v, ru + rv);
        let local = skl
            .get(ru)
            .and_then(|row| row.get(rv))
            .copied()
            .unwrap_or_else(Vector3::zeros);
        Ok(place(&self.transform, local, ru, rv))
    }
}
