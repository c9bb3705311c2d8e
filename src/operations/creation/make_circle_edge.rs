use std::f64::consts::TAU;

use crate::error::Result;
use crate::geometry::curve::{CurveBuilder, CurveData};
use crate::math::Point3;
use crate::topology::{EdgeId, Interval, TopologyStore};

use super::make_edge::edge_on_new_curve;

#[derive(Debug, Clone, Copy)]
enum Construction {
    CenterRadius { center: Point3, radius: f64 },
    CenterBegin { center: Point3, begin: Point3 },
    ThreePoints { begin: Point3, mid: Point3, end: Point3 },
}

/// Creates a closed circular edge over `[0, 2pi]`.
///
/// The edge begins and ends at the same vertex.
pub struct MakeCircleEdge {
    construction: Construction,
}

impl MakeCircleEdge {
    /// Circle of `radius` around `center`, starting on world `+X`.
    #[must_use]
    pub fn from_center_radius(center: Point3, radius: f64) -> Self {
        Self {
            construction: Construction::CenterRadius { center, radius },
        }
    }

    /// Circle around `center` starting at `begin`.
    #[must_use]
    pub fn from_center_begin(center: Point3, begin: Point3) -> Self {
        Self {
            construction: Construction::CenterBegin { center, begin },
        }
    }

    /// Circle through three points, starting at `begin`.
    #[must_use]
    pub fn from_three_points(begin: Point3, mid: Point3, end: Point3) -> Self {
        Self {
            construction: Construction::ThreePoints { begin, mid, end },
        }
    }

    /// Executes the operation, creating the edge in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`](crate::error::GeometryError)
    /// for a vanishing radius or collinear points.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let data = self.curve()?;
        edge_on_new_curve(store, data, Interval::new(0.0, TAU))
    }

    fn curve(&self) -> Result<CurveData> {
        match self.construction {
            Construction::CenterRadius { center, radius } => {
                CurveBuilder::circle_from_center_radius(&center, radius)
            }
            Construction::CenterBegin { center, begin } => {
                CurveBuilder::circle_from_center_begin(&center, &begin)
            }
            Construction::ThreePoints { begin, mid, end } => {
                CurveBuilder::circle_from_three_points(&begin, &mid, &end)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn full_circle_is_closed() {
        let mut store = TopologyStore::new();
        let id = MakeCircleEdge::from_center_radius(Point3::new(1.0, 1.0, 0.0), 3.0)
            .execute(&mut store)
            .unwrap();
        let edge = store.edge(id).unwrap();
        assert!(edge.is_closed());
        assert_relative_eq!(edge.interval.u1, TAU);
        assert_relative_eq!(
            store.vertex(edge.begin).unwrap().point,
            Point3::new(4.0, 1.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn starts_at_begin_point() {
        let mut store = TopologyStore::new();
        let begin = Point3::new(0.0, 2.0, 0.0);
        let id = MakeCircleEdge::from_center_begin(Point3::origin(), begin)
            .execute(&mut store)
            .unwrap();
        let edge = store.edge(id).unwrap();
        assert_relative_eq!(store.vertex(edge.begin).unwrap().point, begin, epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_are_rejected() {
        let mut store = TopologyStore::new();
        let result = MakeCircleEdge::from_three_points(
            Point3::origin(),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        )
        .execute(&mut store);
        assert!(result.is_err());
    }
}
