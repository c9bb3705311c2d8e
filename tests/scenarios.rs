#![allow(clippy::unwrap_used)]

use std::f64::consts::{FRAC_1_SQRT_2, TAU};

use approx::assert_relative_eq;
use parakern::error::{GeometryError, KernelError, TopologyError};
use parakern::geometry::curve::{CurveAlgorithm, CurveBuilder, CurveData};
use parakern::math::{Point3, TOLERANCE};
use parakern::operations::creation::{MakeCircleEdge, MakeFace, MakeLineEdge, MakeLoop};
use parakern::operations::intersect::{intersect, line_x_arc, line_x_line, IntersectParams};
use parakern::operations::query::{CurveCurveIntersect, Length};
use parakern::topology::TopologyStore;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64) -> Point3 {
    Point3::new(x, y, 0.0)
}

fn sample_curves() -> Vec<CurveData> {
    vec![
        CurveBuilder::line_from_begin_end(&p(1.0, 1.0), &p(4.0, -2.0)).unwrap(),
        CurveBuilder::circle_from_center_radius(&p(0.0, 0.0), 2.5).unwrap(),
        CurveBuilder::ellipse_from_center_begin_end(&p(1.0, 0.0), &p(4.0, 1.0), &p(1.0, 2.0))
            .unwrap(),
        CurveBuilder::hyperbola_from_center_ab(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 2.0)).unwrap(),
        CurveBuilder::parabola_from_center_focus(&p(0.0, 0.0), &p(0.0, 1.5)).unwrap(),
        CurveBuilder::nurbs_from_points(&[p(0.0, 0.0), p(1.0, 2.0), p(3.0, 1.0), p(5.0, 3.0)], 3)
            .unwrap(),
    ]
}

fn sample_parameters(curve: &dyn CurveAlgorithm) -> Vec<f64> {
    let domain = curve.domain();
    let (lo, hi) = if domain.is_finite() {
        (domain.t_min, domain.t_max)
    } else {
        (-2.0, 2.0)
    };
    // Stay clear of open ends such as the hyperbola asymptotes.
    (1..10).map(|i| lo + (hi - lo) * f64::from(i) / 10.0).collect()
}

#[test]
fn position_is_zeroth_derivative() {
    init_tracing();
    for data in sample_curves() {
        let curve = data.algorithm().unwrap();
        for u in sample_parameters(curve.as_ref()) {
            let d0 = curve.d(u, 0).unwrap();
            let p = curve.p(u).unwrap();
            assert_eq!(p.coords, d0, "{:?} at u = {u}", curve.kind());
        }
    }
}

#[test]
fn tangent_has_unit_length() {
    init_tracing();
    for data in sample_curves() {
        let curve = data.algorithm().unwrap();
        for u in sample_parameters(curve.as_ref()) {
            let tg = curve.tg(u).unwrap();
            assert_relative_eq!(tg.norm(), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn three_point_circle_through_unit_corners() {
    let data =
        CurveBuilder::circle_from_three_points(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0)).unwrap();
    let CurveData::Arc {
        transform,
        radius_x,
        radius_y,
    } = data
    else {
        panic!("expected an arc");
    };
    assert_relative_eq!(*transform.position(), p(0.5, 0.5), epsilon = 1e-9);
    assert_relative_eq!(radius_x, FRAC_1_SQRT_2, epsilon = 1e-9);
    assert_relative_eq!(radius_y, FRAC_1_SQRT_2, epsilon = 1e-9);

    let pts = [p(-3.0, 1.0), p(2.0, 7.5), p(6.0, -2.0)];
    let data = CurveBuilder::circle_from_three_points(&pts[0], &pts[1], &pts[2]).unwrap();
    let center = *data.transform().position();
    let r0 = (pts[0] - center).norm();
    for q in &pts[1..] {
        assert_relative_eq!((q - center).norm(), r0, epsilon = 1e-9);
    }

    let err = CurveBuilder::circle_from_three_points(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 3.0))
        .unwrap_err();
    assert!(matches!(err, KernelError::Geometry(GeometryError::Degenerate(_))));
}

#[test]
fn edge_lengths() {
    init_tracing();
    let mut store = TopologyStore::new();
    let circle = MakeCircleEdge::from_center_radius(p(1.0, 1.0), 4.0)
        .execute(&mut store)
        .unwrap();
    assert_relative_eq!(Length::new(circle).execute(&store).unwrap(), TAU * 4.0, epsilon = 1e-6);

    let (a, b) = (p(-1.0, 2.0), p(5.0, -6.0));
    let line = MakeLineEdge::new(a, b).execute(&mut store).unwrap();
    assert_relative_eq!(
        Length::new(line).execute(&store).unwrap(),
        (a - b).norm(),
        epsilon = 1e-12
    );

    let edge = store.edge(line).unwrap();
    let alg = store.edge_algorithm(line).unwrap();
    assert_relative_eq!(alg.p(edge.interval.u0).unwrap(), a, epsilon = 1e-9);
    assert_relative_eq!(alg.p(edge.interval.u1).unwrap(), b, epsilon = 1e-9);
}

#[test]
fn square_face_with_round_hole() {
    init_tracing();
    let mut store = TopologyStore::new();
    let corners = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
    let sides: Vec<_> = (0..4)
        .map(|i| {
            MakeLineEdge::new(corners[i], corners[(i + 1) % 4])
                .execute(&mut store)
                .unwrap()
        })
        .collect();
    let outer = MakeLoop::new(sides.iter().map(|&e| (e, true)).collect())
        .execute(&mut store)
        .unwrap();
    let hole_edge = MakeCircleEdge::from_center_radius(p(2.0, 2.0), 1.0)
        .execute(&mut store)
        .unwrap();
    let hole = MakeLoop::new(vec![(hole_edge, false)])
        .execute(&mut store)
        .unwrap();
    let face = MakeFace::new(outer, vec![hole]).execute(&mut store).unwrap();

    let coedges = &store.loop_data(store.face(face).unwrap().outer).unwrap().coedges;
    for (i, &c) in coedges.iter().enumerate() {
        let (_, end) = store.coedge_vertices(c).unwrap();
        let (begin, _) = store.coedge_vertices(coedges[(i + 1) % coedges.len()]).unwrap();
        assert!(store
            .vertex(end)
            .unwrap()
            .coincides(store.vertex(begin).unwrap(), TOLERANCE));
    }

    // Skipping a side leaves a gap after the first coedge.
    let more: Vec<_> = (0..4)
        .map(|i| {
            MakeLineEdge::new(corners[i], corners[(i + 1) % 4])
                .execute(&mut store)
                .unwrap()
        })
        .collect();
    let err = MakeLoop::new(vec![(more[0], true), (more[2], true), (more[3], true)])
        .execute(&mut store)
        .unwrap_err();
    assert!(matches!(
        err,
        KernelError::Topology(TopologyError::LoopNotClosed { index: 0 })
    ));
}

#[test]
fn crossing_diagonals() {
    init_tracing();
    let a = CurveBuilder::line_from_begin_end(&p(0.0, 0.0), &p(20.0, 20.0))
        .unwrap()
        .algorithm()
        .unwrap();
    let b = CurveBuilder::line_from_begin_end(&p(20.0, 0.0), &p(0.0, 20.0))
        .unwrap()
        .algorithm()
        .unwrap();
    let hits = line_x_line(a.as_ref(), b.as_ref(), TOLERANCE).unwrap();
    assert_eq!(hits.len(), 1);
    assert_relative_eq!(hits[0].point, p(10.0, 10.0), epsilon = 1e-9);
    assert_relative_eq!(a.p(hits[0].u0).unwrap(), p(10.0, 10.0), epsilon = 1e-6);
    assert_relative_eq!(b.p(hits[0].u1).unwrap(), p(10.0, 10.0), epsilon = 1e-6);
}

#[test]
fn circle_meets_diagonal_at_its_radius() {
    init_tracing();
    let line = CurveBuilder::line_from_begin_end(&p(0.0, 0.0), &p(20.0, 20.0))
        .unwrap()
        .algorithm()
        .unwrap();
    let circle = CurveBuilder::circle_from_center_radius(&p(0.0, 0.0), 10.0)
        .unwrap()
        .algorithm()
        .unwrap();
    let params = IntersectParams::default();
    let hits = line_x_arc(line.as_ref(), circle.as_ref(), &params).unwrap();
    assert_eq!(hits.len(), 1);
    assert_relative_eq!(hits[0].point.coords.norm(), 10.0, epsilon = 1e-6);
    assert_relative_eq!(line.p(hits[0].u0).unwrap(), hits[0].point, epsilon = 1e-6);
    assert_relative_eq!(circle.p(hits[0].u1).unwrap(), hits[0].point, epsilon = 1e-6);

    // Swapping the arguments swaps the parameters.
    let swapped = intersect(circle.as_ref(), line.as_ref(), &params).unwrap();
    assert_eq!(swapped.len(), 1);
    assert_relative_eq!(swapped[0].u0, hits[0].u1, epsilon = 1e-12);
    assert_relative_eq!(swapped[0].u1, hits[0].u0, epsilon = 1e-12);
}

#[test]
fn edge_query_on_shared_geometry() {
    init_tracing();
    let mut store = TopologyStore::new();
    let circle = MakeCircleEdge::from_center_radius(p(0.0, 0.0), 10.0)
        .execute(&mut store)
        .unwrap();
    let line = MakeLineEdge::new(p(0.0, 0.0), p(20.0, 20.0))
        .execute(&mut store)
        .unwrap();
    let hits = CurveCurveIntersect::new(line, circle).execute(&store).unwrap();
    assert_eq!(hits.len(), 1);
    assert_relative_eq!(hits[0].point.coords.norm(), 10.0, epsilon = 1e-6);
}
