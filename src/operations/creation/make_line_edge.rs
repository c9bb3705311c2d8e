use crate::error::Result;
use crate::geometry::curve::CurveBuilder;
use crate::math::Point3;
use crate::topology::{EdgeId, Interval, TopologyStore};

use super::make_edge::edge_on_new_curve;

/// Creates a straight edge between two points.
///
/// The line is parameterized by arc length, so the interval is
/// `[0, |end - begin|]`.
pub struct MakeLineEdge {
    begin: Point3,
    end: Point3,
}

impl MakeLineEdge {
    /// Creates a new `MakeLineEdge` operation.
    #[must_use]
    pub fn new(begin: Point3, end: Point3) -> Self {
        Self { begin, end }
    }

    /// Executes the operation, creating the edge in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let data = CurveBuilder::line_from_begin_end(&self.begin, &self.end)?;
        let length = (self.end - self.begin).norm();
        edge_on_new_curve(store, data, Interval::new(0.0, length))
    }
}
