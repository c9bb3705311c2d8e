pub mod curve;
pub mod surface;

pub use curve::{CurveAlgorithm, CurveBuilder, CurveData, CurveDomain, CurveKind};
pub use surface::{SurfaceAlgorithm, SurfaceBuilder, SurfaceData, SurfaceDomain, SurfaceKind};
