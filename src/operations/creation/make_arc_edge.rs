use std::f64::consts::TAU;

use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::CurveBuilder;
use crate::math::{Point3, TOLERANCE};
use crate::topology::{EdgeId, Interval, TopologyStore};

use super::make_edge::edge_on_new_curve;

#[derive(Debug, Clone, Copy)]
enum Construction {
    ThreePoints { begin: Point3, mid: Point3, end: Point3 },
    CenterBeginEnd { center: Point3, begin: Point3, end: Point3 },
}

/// Creates a circular arc edge starting at `u = 0`.
pub struct MakeArcEdge {
    construction: Construction,
}

impl MakeArcEdge {
    /// Arc from `begin` through `mid` to `end`.
    ///
    /// The interval is `[0, u(end)]` when `mid` lies on the counter-clockwise
    /// way from `begin` to `end`, otherwise `[0, u(end) - 2pi]`.
    #[must_use]
    pub fn from_three_points(begin: Point3, mid: Point3, end: Point3) -> Self {
        Self {
            construction: Construction::ThreePoints { begin, mid, end },
        }
    }

    /// Counter-clockwise arc around `center` from `begin` to the direction
    /// of `end`; the radius is `|begin - center|`.
    #[must_use]
    pub fn from_center_begin_end(center: Point3, begin: Point3, end: Point3) -> Self {
        Self {
            construction: Construction::CenterBeginEnd { center, begin, end },
        }
    }

    /// Executes the operation, creating the edge in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for collinear points or a
    /// vanishing radius, and [`GeometryError::ZeroVector`] if `end` sits on
    /// the center.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        match self.construction {
            Construction::ThreePoints { begin, mid, end } => {
                let data = CurveBuilder::circle_from_three_points(&begin, &mid, &end)?;
                let alg = data.algorithm()?;
                let u_mid = alg.u(&mid)?;
                let u_end = alg.u(&end)?;
                let sweep = if u_mid < u_end { u_end } else { u_end - TAU };
                trace!(u_mid, u_end, sweep, "arc through three points");
                edge_on_new_curve(store, data, Interval::new(0.0, sweep))
            }
            Construction::CenterBeginEnd { center, begin, end } => {
                let data = CurveBuilder::circle_from_center_begin(&center, &begin)?;
                let to_end = end - center;
                let len = to_end.norm();
                if len < TOLERANCE {
                    return Err(GeometryError::ZeroVector.into());
                }
                let radius = (begin - center).norm();
                let on_circle = center + to_end * (radius / len);
                let alg = data.algorithm()?;
                let mut sweep = alg.u(&on_circle)?;
                // `end` in the direction of `begin` closes the circle.
                if sweep < TOLERANCE {
                    sweep = TAU;
                }
                edge_on_new_curve(store, data, Interval::new(0.0, sweep))
            }
        }
    }
}
