mod make_arc_edge;
mod make_circle_edge;
mod make_edge;
mod make_ellipse_edge;
mod make_face;
mod make_line_edge;
mod make_loop;

pub use make_arc_edge::MakeArcEdge;
pub use make_circle_edge::MakeCircleEdge;
pub use make_edge::MakeEdge;
pub use make_ellipse_edge::MakeEllipseEdge;
pub use make_face::MakeFace;
pub use make_line_edge::MakeLineEdge;
pub use make_loop::MakeLoop;
