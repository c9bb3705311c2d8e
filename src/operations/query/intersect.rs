use std::f64::consts::TAU;

use tracing::trace;

use crate::error::Result;
use crate::geometry::curve::{CurveDomain, CurveKind};
use crate::operations::intersect::{intersect, IntersectParams, IntersectionPoint};
use crate::topology::{EdgeId, Interval, TopologyStore};

/// Slack when testing whether a root parameter lies on an edge.
const PARAMETER_SLACK: f64 = 1e-9;

/// Computes intersections between two edges.
///
/// Sampling is limited to the edge intervals, and roots whose parameter on
/// either curve falls outside that edge's interval are dropped. Arc
/// parameters are compared modulo `2pi` and reported inside the interval.
pub struct CurveCurveIntersect {
    edge_a: EdgeId,
    edge_b: EdgeId,
    params: IntersectParams,
}

impl CurveCurveIntersect {
    /// Creates a new `CurveCurveIntersect` query.
    #[must_use]
    pub fn new(edge_a: EdgeId, edge_b: EdgeId) -> Self {
        Self {
            edge_a,
            edge_b,
            params: IntersectParams::default(),
        }
    }

    /// Overrides the intersection parameters. The sampling ranges are always
    /// taken from the edges.
    #[must_use]
    pub fn params(mut self, params: IntersectParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the query, returning all intersection points.
    ///
    /// `u0` refers to the first edge's curve and `u1` to the second's.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge or curve is missing or evaluation fails.
    pub fn execute(&self, store: &TopologyStore) -> Result<Vec<IntersectionPoint>> {
        let interval_a = store.edge(self.edge_a)?.interval;
        let interval_b = store.edge(self.edge_b)?.interval;
        let curve_a = store.edge_algorithm(self.edge_a)?;
        let curve_b = store.edge_algorithm(self.edge_b)?;

        let params = IntersectParams {
            range0: Some(range(&interval_a)),
            range1: Some(range(&interval_b)),
            ..self.params
        };
        let hits = intersect(curve_a.as_ref(), curve_b.as_ref(), &params)?;

        let (kind_a, kind_b) = (curve_a.kind(), curve_b.kind());
        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                let u0 = on_interval(kind_a, hit.u0, &interval_a);
                let u1 = on_interval(kind_b, hit.u1, &interval_b);
                match (u0, u1) {
                    (Some(u0), Some(u1)) => Some(IntersectionPoint { u0, u1, ..hit }),
                    _ => {
                        trace!(u0 = hit.u0, u1 = hit.u1, "root outside edge interval");
                        None
                    }
                }
            })
            .collect())
    }
}

fn range(interval: &Interval) -> CurveDomain {
    let (lo, hi) = interval.bounds();
    CurveDomain::new(lo, hi)
}

/// Maps `u` into `interval`, shifting arc parameters by whole turns.
fn on_interval(kind: CurveKind, u: f64, interval: &Interval) -> Option<f64> {
    if kind == CurveKind::Arc {
        (-2..=2)
            .map(|turns| u + f64::from(turns) * TAU)
            .find(|&shifted| interval.contains(shifted, PARAMETER_SLACK))
    } else {
        interval.contains(u, PARAMETER_SLACK).then_some(u)
    }
}
