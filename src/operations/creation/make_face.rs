use tracing::debug;

use crate::error::Result;
use crate::math::{FrameId, Transform};
use crate::topology::{FaceData, FaceId, LoopId, SurfaceId, TopologyStore};

/// Creates a face from an outer loop and optional hole loops.
///
/// The face gets its own frame in the store's frame tree; moving the face
/// later only replaces that frame and never edits the shared geometry.
pub struct MakeFace {
    outer: LoopId,
    holes: Vec<LoopId>,
    surface: Option<SurfaceId>,
    transform: Option<Transform>,
    parent: Option<FrameId>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation.
    #[must_use]
    pub fn new(outer: LoopId, holes: Vec<LoopId>) -> Self {
        Self {
            outer,
            holes,
            surface: None,
            transform: None,
            parent: None,
        }
    }

    /// Sets the underlying surface.
    #[must_use]
    pub fn surface(mut self, surface: SurfaceId) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Sets the face's local transform (identity by default).
    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Nests the face's frame under `parent`.
    #[must_use]
    pub fn parent(mut self, parent: FrameId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a loop, the surface or the parent frame is not in
    /// the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        store.loop_data(self.outer)?;
        for &hole in &self.holes {
            store.loop_data(hole)?;
        }
        if let Some(surface) = self.surface {
            store.surface(surface)?;
        }
        let local = self.transform.unwrap_or_else(Transform::identity);
        let frame = store.add_frame(local, self.parent)?;
        let id = store.add_face(FaceData {
            outer: self.outer,
            holes: self.holes.clone(),
            surface: self.surface,
            frame,
        });
        debug!(?id, holes = self.holes.len(), "face created");
        Ok(id)
    }
}
