use crate::error::{GeometryError, Result};
use crate::geometry::curve::{CurveAlgorithm, CurveData};
use crate::math::{Transform, Vector3};

use super::{place, SurfaceAlgorithm, SurfaceDomain, SurfaceKind};

/// Translational sweep: `P(u, v) = profile(u) + path(v) - path(v_start)`.
///
/// `u` runs over the profile's domain and `v` over the path's.
#[derive(Debug)]
pub struct SweepAlgorithm {
    transform: Transform,
    profile: Box<dyn CurveAlgorithm>,
    path: Box<dyn CurveAlgorithm>,
    path_start: Vector3,
}

impl SweepAlgorithm {
    /// Builds the profile and path algorithms.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnboundedDomain`] if the path has no start.
    pub fn new(transform: Transform, profile: &CurveData, path: &CurveData) -> Result<Self> {
        let profile = profile.algorithm()?;
        let path = path.algorithm()?;
        if !path.is_bounded() {
            return Err(GeometryError::UnboundedDomain.into());
        }
        let path_start = path.d(path.domain().t_min, 0)?;
        Ok(Self {
            transform,
            profile,
            path,
            path_start,
        })
    }
}

impl SurfaceAlgorithm for SweepAlgorithm {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Sweep
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> SurfaceDomain {
        let u = self.profile.domain();
        let v = self.path.domain();
        SurfaceDomain::new(u.t_min, u.t_max, v.t_min, v.t_max)
    }

    fn d(&self, u: f64, v: f64, ru: usize, rv: usize) -> Result<Vector3> {
        let local = match (ru, rv) {
            (0, 0) => self.profile.d(u, 0)? + self.path.d(v, 0)? - self.path_start,
            (_, 0) => self.profile.d(u, ru)?,
            (0, _) => self.path.d(v, rv)?,
            _ => Vector3::zeros(),
        };
        Ok(place(&self.transform, local, ru, rv))
    }
}
