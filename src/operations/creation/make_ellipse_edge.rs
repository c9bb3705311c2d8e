use std::f64::consts::TAU;

use crate::error::Result;
use crate::geometry::curve::CurveBuilder;
use crate::math::Point3;
use crate::topology::{EdgeId, Interval, TopologyStore};

use super::make_edge::edge_on_new_curve;

/// Creates a closed elliptical edge over `[0, 2pi]`.
pub struct MakeEllipseEdge {
    center: Point3,
    begin: Point3,
    end: Point3,
}

impl MakeEllipseEdge {
    /// Ellipse around `center` with its major axis through `begin`; the minor
    /// radius is the distance of `end` from that axis.
    #[must_use]
    pub fn from_center_begin_end(center: Point3, begin: Point3, end: Point3) -> Self {
        Self { center, begin, end }
    }

    /// Executes the operation, creating the edge in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`](crate::error::GeometryError) if
    /// either radius vanishes.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let data =
            CurveBuilder::ellipse_from_center_begin_end(&self.center, &self.begin, &self.end)?;
        edge_on_new_curve(store, data, Interval::new(0.0, TAU))
    }
}
