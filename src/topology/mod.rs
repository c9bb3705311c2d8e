pub mod coedge;
pub mod edge;
pub mod face;
pub mod loops;
pub mod vertex;

pub use coedge::{CoedgeData, CoedgeId};
pub use edge::{EdgeData, EdgeId, Interval};
pub use face::{FaceData, FaceId};
pub use loops::{LoopData, LoopId};
pub use vertex::{VertexData, VertexId};

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::curve::{CurveAlgorithm, CurveData};
use crate::geometry::surface::{SurfaceAlgorithm, SurfaceData};
use crate::math::{FrameId, FrameTree, Isometry3, Transform};

slotmap::new_key_type! {
    /// Unique identifier for a shared curve record.
    pub struct CurveId;
}

slotmap::new_key_type! {
    /// Unique identifier for a shared surface record.
    pub struct SurfaceId;
}

/// Central arena that owns all topological entities and the geometry they
/// share.
///
/// Entities reference each other via typed IDs (generational indices).
/// Curves, surfaces and frames are append-only: nothing is ever removed, so a
/// handle stays valid for the life of the store.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    coedges: SlotMap<CoedgeId, CoedgeData>,
    loops: SlotMap<LoopId, LoopData>,
    faces: SlotMap<FaceId, FaceData>,
    curves: SlotMap<CurveId, CurveData>,
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    frames: FrameTree,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> std::result::Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or(TopologyError::EntityNotFound("vertex"))
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> std::result::Result<&EdgeData, TopologyError> {
        self.edges.get(id).ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge_mut(&mut self, id: EdgeId) -> std::result::Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Builds the algorithm for the curve an edge lies on.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or its curve is missing, or the curve
    /// record is invalid.
    pub fn edge_algorithm(&self, id: EdgeId) -> Result<Box<dyn CurveAlgorithm>> {
        let edge = self.edge(id)?;
        self.curve(edge.curve)?.algorithm()
    }

    // --- Coedge operations ---

    /// Inserts a coedge and returns its ID.
    pub fn add_coedge(&mut self, data: CoedgeData) -> CoedgeId {
        self.coedges.insert(data)
    }

    /// Returns a reference to the coedge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn coedge(&self, id: CoedgeId) -> std::result::Result<&CoedgeData, TopologyError> {
        self.coedges
            .get(id)
            .ok_or(TopologyError::EntityNotFound("coedge"))
    }

    /// Returns the `(begin, end)` vertices of a coedge in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the coedge or its edge is not found.
    pub fn coedge_vertices(
        &self,
        id: CoedgeId,
    ) -> std::result::Result<(VertexId, VertexId), TopologyError> {
        let coedge = self.coedge(id)?;
        let edge = self.edge(coedge.edge)?;
        Ok(if coedge.same_sense {
            (edge.begin, edge.end)
        } else {
            (edge.end, edge.begin)
        })
    }

    // --- Loop operations ---

    /// Inserts a loop and returns its ID.
    pub fn add_loop(&mut self, data: LoopData) -> LoopId {
        self.loops.insert(data)
    }

    /// Returns a reference to the loop data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn loop_data(&self, id: LoopId) -> std::result::Result<&LoopData, TopologyError> {
        self.loops.get(id).ok_or(TopologyError::EntityNotFound("loop"))
    }

    /// Returns a mutable reference to the loop data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn loop_mut(&mut self, id: LoopId) -> std::result::Result<&mut LoopData, TopologyError> {
        self.loops
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("loop"))
    }

    // --- Face operations ---

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> std::result::Result<&FaceData, TopologyError> {
        self.faces.get(id).ok_or(TopologyError::EntityNotFound("face"))
    }

    /// World placement of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or its frame is not found.
    pub fn face_world(&self, id: FaceId) -> Result<Isometry3> {
        let frame = self.face(id)?.frame;
        self.frames.world(frame)
    }

    /// Moves a face by giving it a new local transform.
    ///
    /// A fresh frame with the same parent is appended and the face is
    /// repointed to it; the old frame and all shared geometry are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or its frame is not found.
    pub fn set_face_transform(&mut self, id: FaceId, transform: Transform) -> Result<FrameId> {
        let old = self.face(id)?.frame;
        let parent = self.frames.frame(old)?.parent;
        let frame = self.frames.push(transform, parent)?;
        if let Some(face) = self.faces.get_mut(id) {
            face.frame = frame;
        }
        debug!(?id, ?frame, "face moved to new frame");
        Ok(frame)
    }

    // --- Shared geometry ---

    /// Stores a curve record and returns its handle.
    pub fn add_curve(&mut self, data: CurveData) -> CurveId {
        self.curves.insert(data)
    }

    /// Returns a curve record, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn curve(&self, id: CurveId) -> std::result::Result<&CurveData, TopologyError> {
        self.curves
            .get(id)
            .ok_or(TopologyError::EntityNotFound("curve"))
    }

    /// Stores a surface record and returns its handle.
    pub fn add_surface(&mut self, data: SurfaceData) -> SurfaceId {
        self.surfaces.insert(data)
    }

    /// Returns a surface record, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface(&self, id: SurfaceId) -> std::result::Result<&SurfaceData, TopologyError> {
        self.surfaces
            .get(id)
            .ok_or(TopologyError::EntityNotFound("surface"))
    }

    /// Builds the algorithm for a stored surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is missing or invalid.
    pub fn surface_algorithm(&self, id: SurfaceId) -> Result<Box<dyn SurfaceAlgorithm>> {
        self.surface(id)?.algorithm()
    }

    // --- Frames ---

    /// Appends a frame to the store's frame tree.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not in the tree.
    pub fn add_frame(&mut self, local: Transform, parent: Option<FrameId>) -> Result<FrameId> {
        self.frames.push(local, parent)
    }

    /// Returns the frame tree.
    #[must_use]
    pub fn frames(&self) -> &FrameTree {
        &self.frames
    }
}
