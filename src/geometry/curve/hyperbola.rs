use std::f64::consts::FRAC_PI_2;

use crate::error::{GeometryError, Result};
use crate::math::precise::{DecimalContext, Precise};
use crate::math::{Point3, Transform, Vector3};

use super::{CurveAlgorithm, CurveData, CurveDomain, CurveKind};

const SEGMENTS: usize = 32;

/// Highest derivative order with a closed form.
const MAX_ORDER: usize = 3;

/// The right branch of a hyperbola in the local XY plane of its transform.
///
/// The parametric form is `P(u) = (a sec u, b tan u)` for `u` in
/// `(-pi/2, pi/2)`. Evaluation runs in decimal arithmetic because `sec` and
/// `tan` blow up toward the ends of the domain.
#[derive(Debug, Clone)]
pub struct HyperbolaAlgorithm {
    transform: Transform,
    radius_x: f64,
    radius_y: f64,
    context: DecimalContext,
}

impl HyperbolaAlgorithm {
    /// Creates a hyperbola algorithm with the default decimal precision.
    #[must_use]
    pub fn new(transform: Transform, radius_x: f64, radius_y: f64) -> Self {
        Self {
            transform,
            radius_x,
            radius_y,
            context: DecimalContext::default(),
        }
    }

    /// Replaces the decimal precision used for evaluation.
    #[must_use]
    pub fn with_context(mut self, context: DecimalContext) -> Self {
        self.context = context;
        self
    }

    /// Binds to a [`CurveData::Hyperbola`] record.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedCurveType`] for any other kind.
    pub fn from_data(data: &CurveData) -> Result<Self> {
        match data {
            CurveData::Hyperbola {
                transform,
                radius_x,
                radius_y,
            } => Ok(Self::new(*transform, *radius_x, *radius_y)),
            other => Err(GeometryError::UnsupportedCurveType(other.kind()).into()),
        }
    }

    /// Returns the `(a, b)` semi-axes.
    #[must_use]
    pub fn radii(&self) -> (f64, f64) {
        (self.radius_x, self.radius_y)
    }

    fn local_derivative(&self, u: f64, order: usize) -> Result<(f64, f64)> {
        if order > MAX_ORDER {
            return Err(GeometryError::UnsupportedDerivativeOrder {
                kind: CurveKind::Hyperbola,
                order,
            }
            .into());
        }
        let ctx = self.context;
        let phi = ctx.value(u)?;
        let sec = phi.sec()?;
        let tan = phi.tan()?;
        let a = ctx.value(self.radius_x)?;
        let b = ctx.value(self.radius_y)?;
        let sec2 = sec.checked_mul(sec)?;
        let tan2 = tan.checked_mul(tan)?;

        let (x, y): (Precise, Precise) = match order {
            0 => (a.checked_mul(sec)?, b.checked_mul(tan)?),
            1 => (a.checked_mul(sec)?.checked_mul(tan)?, b.checked_mul(sec2)?),
            2 => {
                let x = a
                    .checked_mul(sec)?
                    .checked_mul(tan2.scaled(2)?.checked_add(ctx.value(1.0)?)?)?;
                let y = b.checked_mul(sec2)?.checked_mul(tan)?.scaled(2)?;
                (x, y)
            }
            _ => {
                let x = a
                    .checked_mul(sec)?
                    .checked_mul(tan)?
                    .checked_mul(sec2.scaled(6)?.checked_sub(ctx.value(1.0)?)?)?;
                let y = b.checked_mul(
                    sec2.checked_mul(tan2)?
                        .scaled(4)?
                        .checked_add(sec2.checked_mul(sec2)?.scaled(2)?)?,
                )?;
                (x, y)
            }
        };
        Ok((x.to_f64()?, y.to_f64()?))
    }
}

impl CurveAlgorithm for HyperbolaAlgorithm {
    fn kind(&self) -> CurveKind {
        CurveKind::Hyperbola
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(-FRAC_PI_2, FRAC_PI_2)
    }

    /// The asymptotes make the ends unreachable, so the domain cannot be
    /// sampled without an explicit range.
    fn is_bounded(&self) -> bool {
        false
    }

    fn segments_hint(&self) -> usize {
        SEGMENTS
    }

    fn d(&self, u: f64, order: usize) -> Result<Vector3> {
        let (x, y) = self.local_derivative(u, order)?;
        let local = Vector3::new(x, y, 0.0);
        if order == 0 {
            Ok(self.transform.point_to_world(&Point3::from(local)).coords)
        } else {
            Ok(self.transform.vector_to_world(&local))
        }
    }

    fn u(&self, point: &Point3) -> Result<f64> {
        let local = self.transform.point_to_local(point);
        let ctx = self.context;
        let mut phi = ctx
            .value(local.y)?
            .checked_div(ctx.value(self.radius_y)?)?
            .atan()?;
        // Points on the left branch map past the right branch's domain.
        if local.x < 0.0 {
            phi = phi.checked_add(ctx.pi())?;
        }
        phi.to_f64()
    }

    fn g(&self, point: &Point3) -> Result<f64> {
        let local = self.transform.point_to_local(point);
        let x = local.x / self.radius_x;
        let y = local.y / self.radius_y;
        Ok(x * x - y * y - 1.0)
    }
}
