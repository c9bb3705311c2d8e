use super::coedge::CoedgeId;

slotmap::new_key_type! {
    /// Unique identifier for a loop in the topology store.
    pub struct LoopId;
}

/// A closed, ordered cycle of coedges.
///
/// Each coedge ends where the next one begins, and the last one ends where
/// the first begins. Closure is checked when the loop is assembled.
#[derive(Debug, Clone, Default)]
pub struct LoopData {
    /// The coedges in traversal order.
    pub coedges: Vec<CoedgeId>,
}
