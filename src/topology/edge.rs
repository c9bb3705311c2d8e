use super::coedge::CoedgeId;
use super::vertex::VertexId;
use super::CurveId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// Directed parameter interval of an edge on its curve.
///
/// `u0 > u1` is valid: the edge then runs against the curve's natural
/// direction, reversing traversal and tangent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Parameter at the begin vertex.
    pub u0: f64,
    /// Parameter at the end vertex.
    pub u1: f64,
}

impl Interval {
    /// Creates a new interval.
    #[must_use]
    pub fn new(u0: f64, u1: f64) -> Self {
        Self { u0, u1 }
    }

    /// Signed width `u1 - u0`.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.u1 - self.u0
    }

    /// Lower and upper bound regardless of direction.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.u0.min(self.u1), self.u0.max(self.u1))
    }

    /// Whether `u` lies between the two ends, widened by `tolerance`.
    #[must_use]
    pub fn contains(&self, u: f64, tolerance: f64) -> bool {
        let (lo, hi) = self.bounds();
        u >= lo - tolerance && u <= hi + tolerance
    }
}

/// Data associated with a topological edge.
///
/// An edge is a bounded piece of a shared curve between two vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// The curve this edge lies on.
    pub curve: CurveId,
    /// Parameter interval on the curve.
    pub interval: Interval,
    /// Vertex at `interval.u0`.
    pub begin: VertexId,
    /// Vertex at `interval.u1`.
    pub end: VertexId,
    /// Coedge using this edge in its own direction.
    pub forward: Option<CoedgeId>,
    /// Coedge using this edge against its direction.
    pub backward: Option<CoedgeId>,
}

impl EdgeData {
    /// Creates an edge with no coedges attached.
    #[must_use]
    pub fn new(curve: CurveId, interval: Interval, begin: VertexId, end: VertexId) -> Self {
        Self {
            curve,
            interval,
            begin,
            end,
            forward: None,
            backward: None,
        }
    }

    /// Whether the edge starts and ends at the same vertex.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.begin == self.end
    }
}
