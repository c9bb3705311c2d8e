use crate::math::FrameId;

use super::loops::LoopId;
use super::SurfaceId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// Data associated with a topological face.
///
/// A face is a region bounded by an outer loop and optional hole loops,
/// optionally carried by a surface, and placed by its own frame.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The outer boundary loop.
    pub outer: LoopId,
    /// Inner boundary loops (holes).
    pub holes: Vec<LoopId>,
    /// The carrier surface, if any.
    pub surface: Option<SurfaceId>,
    /// Placement of the face in the store's frame tree.
    pub frame: FrameId,
}
