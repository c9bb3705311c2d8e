use super::edge::EdgeId;
use super::loops::LoopId;

slotmap::new_key_type! {
    /// Unique identifier for a coedge in the topology store.
    pub struct CoedgeId;
}

/// One directed use of an edge by a loop.
#[derive(Debug, Clone, Copy)]
pub struct CoedgeData {
    /// The edge being used.
    pub edge: EdgeId,
    /// If `true`, the loop traverses the edge from begin to end.
    pub same_sense: bool,
    /// The loop that owns this coedge.
    pub owner: LoopId,
}
