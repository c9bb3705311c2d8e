use thiserror::Error;

use crate::geometry::curve::CurveKind;

/// Top-level error type for the parakern kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Errors related to geometric construction and evaluation.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("{kind:?} curve has no closed form for derivative order {order}")]
    UnsupportedDerivativeOrder { kind: CurveKind, order: usize },

    #[error("no algorithm registered for {0:?} curves")]
    UnsupportedCurveType(CurveKind),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("curve domain is unbounded; an explicit parameter range is required")]
    UnboundedDomain,

    #[error("decimal arithmetic overflowed while computing {0}")]
    PrecisionOverflow(&'static str),

    #[error("invalid NURBS definition: {0}")]
    InvalidNurbs(String),
}

/// Errors related to topological assembly.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("loop is not closed: coedge {index} does not end where the next one begins")]
    LoopNotClosed { index: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Convenience type alias for results using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;
