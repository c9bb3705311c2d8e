use tracing::trace;

use crate::error::Result;
use crate::geometry::curve::CurveData;
use crate::math::{Point3, TOLERANCE};
use crate::topology::{CurveId, EdgeData, EdgeId, Interval, TopologyStore, VertexData};

/// Creates an edge on a curve that is already in the store.
///
/// Vertices are placed at `p(u0)` and `p(u1)`. When both ends coincide the
/// edge is closed and uses a single vertex.
pub struct MakeEdge {
    curve: CurveId,
    interval: Interval,
}

impl MakeEdge {
    /// Creates a new `MakeEdge` operation.
    #[must_use]
    pub fn new(curve: CurveId, interval: Interval) -> Self {
        Self { curve, interval }
    }

    /// Executes the operation, creating the edge in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is missing or cannot be evaluated at the
    /// interval ends.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let alg = store.curve(self.curve)?.algorithm()?;
        let begin = alg.p(self.interval.u0)?;
        let end = alg.p(self.interval.u1)?;
        Ok(insert_edge(store, self.curve, self.interval, begin, end))
    }
}

/// Stores `data` and an edge over `interval` on it.
///
/// Everything that can fail is evaluated before the store is touched.
pub(super) fn edge_on_new_curve(
    store: &mut TopologyStore,
    data: CurveData,
    interval: Interval,
) -> Result<EdgeId> {
    let alg = data.algorithm()?;
    let begin = alg.p(interval.u0)?;
    let end = alg.p(interval.u1)?;
    let curve = store.add_curve(data);
    Ok(insert_edge(store, curve, interval, begin, end))
}

fn insert_edge(
    store: &mut TopologyStore,
    curve: CurveId,
    interval: Interval,
    begin: Point3,
    end: Point3,
) -> EdgeId {
    let begin_vertex = store.add_vertex(VertexData::new(begin));
    let end_vertex = if (end - begin).norm() <= TOLERANCE {
        begin_vertex
    } else {
        store.add_vertex(VertexData::new(end))
    };
    let id = store.add_edge(EdgeData::new(curve, interval, begin_vertex, end_vertex));
    trace!(?id, u0 = interval.u0, u1 = interval.u1, "edge created");
    id
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::CurveBuilder;
    use approx::assert_relative_eq;

    #[test]
    fn edges_share_one_curve() {
        let mut store = TopologyStore::new();
        let curve = store.add_curve(
            CurveBuilder::line_from_begin_end(&Point3::origin(), &Point3::new(10.0, 0.0, 0.0))
                .unwrap(),
        );
        let a = MakeEdge::new(curve, Interval::new(0.0, 4.0))
            .execute(&mut store)
            .unwrap();
        let b = MakeEdge::new(curve, Interval::new(10.0, 6.0))
            .execute(&mut store)
            .unwrap();

        let (ea, eb) = (store.edge(a).unwrap(), store.edge(b).unwrap());
        assert_eq!(ea.curve, eb.curve);
        let end = store.vertex(ea.end).unwrap().point;
        assert_relative_eq!(end, Point3::new(4.0, 0.0, 0.0), epsilon = 1e-12);
        let begin = store.vertex(eb.begin).unwrap().point;
        assert_relative_eq!(begin, Point3::new(10.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn full_turn_is_closed() {
        let mut store = TopologyStore::new();
        let curve = store.add_curve(
            CurveBuilder::circle_from_center_radius(&Point3::origin(), 2.0).unwrap(),
        );
        let id = MakeEdge::new(curve, Interval::new(0.0, std::f64::consts::TAU))
            .execute(&mut store)
            .unwrap();
        assert!(store.edge(id).unwrap().is_closed());
    }
}
