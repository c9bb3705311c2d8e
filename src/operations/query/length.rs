use std::f64::consts::{PI, TAU};

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::geometry::curve::{CurveAlgorithm, CurveData, NurbsAlgorithm};
use crate::math::TOLERANCE;
use crate::topology::{EdgeId, Interval, TopologyStore};

/// Sample points of the first chord estimate.
const INITIAL_SAMPLES: usize = 8;

/// Parameters controlling the chord-sum length estimate.
#[derive(Debug, Clone, Copy)]
pub struct LengthParams {
    /// Refinement stops once an estimate changes by less than this.
    pub tolerance: f64,
    /// If the first estimate already exceeds this, it is returned as is.
    pub min: Option<f64>,
    /// Maximum number of sample doublings.
    pub max_refinements: usize,
}

impl Default for LengthParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            min: None,
            max_refinements: 16,
        }
    }
}

/// Computes the length of an edge.
pub struct Length {
    edge: EdgeId,
    params: LengthParams,
}

impl Length {
    /// Creates a new `Length` query.
    #[must_use]
    pub fn new(edge: EdgeId) -> Self {
        Self {
            edge,
            params: LengthParams::default(),
        }
    }

    /// Sets the refinement tolerance.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.params.tolerance = tolerance;
        self
    }

    /// Sets the early-return bound.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.params.min = Some(min);
        self
    }

    /// Replaces all parameters.
    #[must_use]
    pub fn params(mut self, params: LengthParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the query, returning the edge length.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or its curve is not found, or the curve
    /// cannot be evaluated over the edge interval.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let edge = store.edge(self.edge)?;
        curve_length(store.curve(edge.curve)?, &edge.interval, &self.params)
    }
}

/// Length of `data` between the ends of `interval`.
///
/// * Line: `|u1 - u0|`, the line being parameterized by arc length.
/// * Circular arc: `|u1 - u0| * r`.
/// * Full ellipse: Ramanujan's second perimeter approximation.
/// * NURBS: quadrature over the knot spans.
/// * Anything else: refined chord sum, see [`LengthParams`].
///
/// # Errors
///
/// Returns an error if the curve cannot be evaluated over the interval.
pub fn curve_length(data: &CurveData, interval: &Interval, params: &LengthParams) -> Result<f64> {
    let sweep = interval.span().abs();
    match data {
        CurveData::Line { .. } => Ok(sweep),
        CurveData::Arc {
            radius_x, radius_y, ..
        } if (radius_x - radius_y).abs() < TOLERANCE => Ok(sweep * radius_x),
        CurveData::Arc {
            radius_x, radius_y, ..
        } if (sweep - TAU).abs() < TOLERANCE => Ok(ellipse_perimeter(*radius_x, *radius_y)),
        CurveData::Nurbs { .. } => {
            let alg = NurbsAlgorithm::from_data(data)?;
            Ok(alg.arc_length_between(interval.u0, interval.u1))
        }
        _ => chord_length(data.algorithm()?.as_ref(), interval, params),
    }
}

/// Ramanujan's second approximation of an ellipse perimeter.
#[must_use]
pub fn ellipse_perimeter(a: f64, b: f64) -> f64 {
    let h = ((a - b) / (a + b)).powi(2);
    PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

fn chord_length(
    curve: &dyn CurveAlgorithm,
    interval: &Interval,
    params: &LengthParams,
) -> Result<f64> {
    let mut samples = INITIAL_SAMPLES;
    let mut estimate = polyline_length(curve, interval, samples)?;
    if let Some(min) = params.min {
        if estimate > min {
            debug!(estimate, min, "length exceeds bound on first estimate");
            return Ok(estimate);
        }
    }

    for step in 0..params.max_refinements {
        // Midpoint insertion doubles the segment count.
        samples = 2 * samples - 1;
        let refined = polyline_length(curve, interval, samples)?;
        trace!(step, samples, refined, "length refinement");
        if (refined - estimate).abs() < params.tolerance {
            debug!(length = refined, samples, "length converged");
            return Ok(refined);
        }
        estimate = refined;
    }
    warn!(
        max_refinements = params.max_refinements,
        estimate, "length refinement cap reached"
    );
    Ok(estimate)
}

/// Summed chord length over `samples` uniform points.
fn polyline_length(curve: &dyn CurveAlgorithm, interval: &Interval, samples: usize) -> Result<f64> {
    let segments = samples.saturating_sub(1).max(1);
    let mut prev = curve.p(interval.u0)?;
    let mut total = 0.0;
    for i in 1..=segments {
        #[allow(clippy::cast_precision_loss)]
        let u = interval.u0 + interval.span() * i as f64 / segments as f64;
        let next = curve.p(u)?;
        total += (next - prev).norm();
        prev = next;
    }
    Ok(total)
}
