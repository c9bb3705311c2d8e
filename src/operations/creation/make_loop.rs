use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::math::TOLERANCE;
use crate::topology::{CoedgeData, EdgeId, LoopData, LoopId, TopologyStore, VertexId};

/// Creates a closed loop from an ordered list of edge uses.
///
/// Each use is `(edge, same_sense)`; `same_sense = false` walks the edge from
/// its end vertex to its begin vertex. Consecutive uses must meet at a shared
/// vertex or at two vertices within [`TOLERANCE`] of each other, and the last
/// use must lead back to the first.
pub struct MakeLoop {
    uses: Vec<(EdgeId, bool)>,
}

impl MakeLoop {
    /// Creates a new `MakeLoop` operation.
    #[must_use]
    pub fn new(uses: Vec<(EdgeId, bool)>) -> Self {
        Self { uses }
    }

    /// Executes the operation, creating the loop and its coedges.
    ///
    /// Nothing is written to the store unless the loop is valid.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] for an empty loop or an
    /// edge already used in the same direction, and
    /// [`TopologyError::LoopNotClosed`] if a coedge does not end where the
    /// next one begins.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<LoopId> {
        if self.uses.is_empty() {
            return Err(TopologyError::InvalidTopology("loop has no edges".into()).into());
        }

        let mut claimed = HashSet::with_capacity(self.uses.len());
        let mut ends: Vec<(VertexId, VertexId)> = Vec::with_capacity(self.uses.len());
        for &(id, same_sense) in &self.uses {
            let edge = store.edge(id)?;
            let slot = if same_sense { edge.forward } else { edge.backward };
            if slot.is_some() || !claimed.insert((id, same_sense)) {
                let sense = if same_sense { "forward" } else { "backward" };
                return Err(TopologyError::InvalidTopology(format!(
                    "edge {id:?} is already used {sense}"
                ))
                .into());
            }
            ends.push(if same_sense {
                (edge.begin, edge.end)
            } else {
                (edge.end, edge.begin)
            });
        }

        for (index, &(_, end)) in ends.iter().enumerate() {
            let next = ends[(index + 1) % ends.len()].0;
            if end != next && !store.vertex(end)?.coincides(store.vertex(next)?, TOLERANCE) {
                return Err(TopologyError::LoopNotClosed { index }.into());
            }
        }

        let id = store.add_loop(LoopData::default());
        let mut coedges = Vec::with_capacity(self.uses.len());
        for &(edge, same_sense) in &self.uses {
            let coedge = store.add_coedge(CoedgeData {
                edge,
                same_sense,
                owner: id,
            });
            let data = store.edge_mut(edge)?;
            if same_sense {
                data.forward = Some(coedge);
            } else {
                data.backward = Some(coedge);
            }
            coedges.push(coedge);
        }
        store.loop_mut(id)?.coedges = coedges;
        debug!(?id, coedges = self.uses.len(), "loop assembled");
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use crate::math::Point3;
    use crate::operations::creation::{MakeCircleEdge, MakeLineEdge};

    fn triangle(store: &mut TopologyStore) -> Vec<EdgeId> {
        let pts = [
            Point3::origin(),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        (0..3)
            .map(|i| {
                MakeLineEdge::new(pts[i], pts[(i + 1) % 3])
                    .execute(store)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn triangle_closes() {
        let mut store = TopologyStore::new();
        let edges = triangle(&mut store);
        let id = MakeLoop::new(edges.iter().map(|&e| (e, true)).collect())
            .execute(&mut store)
            .unwrap();

        let coedges = &store.loop_data(id).unwrap().coedges;
        assert_eq!(coedges.len(), 3);
        for (i, &c) in coedges.iter().enumerate() {
            let next = coedges[(i + 1) % coedges.len()];
            let (_, end) = store.coedge_vertices(c).unwrap();
            let (begin, _) = store.coedge_vertices(next).unwrap();
            let (a, b) = (store.vertex(end).unwrap(), store.vertex(begin).unwrap());
            assert!(a.coincides(b, TOLERANCE));
            assert_eq!(store.coedge(c).unwrap().owner, id);
        }
        assert!(store.edge(edges[0]).unwrap().forward.is_some());
        assert!(store.edge(edges[0]).unwrap().backward.is_none());
    }

    #[test]
    fn reversed_triangle_closes() {
        let mut store = TopologyStore::new();
        let edges = triangle(&mut store);
        let id = MakeLoop::new(edges.iter().rev().map(|&e| (e, false)).collect())
            .execute(&mut store)
            .unwrap();
        assert_eq!(store.loop_data(id).unwrap().coedges.len(), 3);
        assert!(store.edge(edges[1]).unwrap().backward.is_some());
    }

    #[test]
    fn open_chain_is_rejected() {
        let mut store = TopologyStore::new();
        let edges = triangle(&mut store);
        let err = MakeLoop::new(vec![(edges[0], true), (edges[2], true)])
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            KernelError::Topology(TopologyError::LoopNotClosed { index: 0 })
        ));
        // A failed loop leaves the edges free.
        assert!(store.edge(edges[0]).unwrap().forward.is_none());
    }

    #[test]
    fn single_closed_edge_is_a_loop() {
        let mut store = TopologyStore::new();
        let circle = MakeCircleEdge::from_center_radius(Point3::origin(), 1.0)
            .execute(&mut store)
            .unwrap();
        assert!(MakeLoop::new(vec![(circle, true)]).execute(&mut store).is_ok());
    }

    #[test]
    fn same_direction_twice_is_rejected() {
        let mut store = TopologyStore::new();
        let circle = MakeCircleEdge::from_center_radius(Point3::origin(), 1.0)
            .execute(&mut store)
            .unwrap();
        MakeLoop::new(vec![(circle, true)])
            .execute(&mut store)
            .unwrap();
        let err = MakeLoop::new(vec![(circle, true)])
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            KernelError::Topology(TopologyError::InvalidTopology(_))
        ));
        // The opposite direction is still free.
        assert!(MakeLoop::new(vec![(circle, false)]).execute(&mut store).is_ok());
    }

    #[test]
    fn empty_loop_is_rejected() {
        let mut store = TopologyStore::new();
        assert!(MakeLoop::new(Vec::new()).execute(&mut store).is_err());
    }
}
