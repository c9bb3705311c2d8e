mod intersect;
mod length;

pub use intersect::CurveCurveIntersect;
pub use length::{curve_length, ellipse_perimeter, Length, LengthParams};
