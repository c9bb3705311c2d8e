use nalgebra::Translation3;

use crate::error::{GeometryError, Result, TopologyError};

use super::{planar_angle, Isometry3, Matrix4, Point3, Rotation, Vector3, TOLERANCE};

/// Placement of a local coordinate system: a rotation followed by a
/// translation to `position`.
///
/// Planar (2D) geometry uses rotations about `+Z` only; [`Transform::angle`]
/// reads that angle back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Point3,
    rotation: Rotation,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Creates a transform from a position and a rotation.
    #[must_use]
    pub fn new(position: Point3, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    /// The identity placement.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Point3::origin(), Rotation::identity())
    }

    /// Creates a planar transform rotated by `angle` radians about `+Z`.
    #[must_use]
    pub fn planar(position: Point3, angle: f64) -> Self {
        Self::new(position, Rotation::from_axis_angle(&Vector3::z_axis(), angle))
    }

    /// Creates a transform whose local `+X` axis points along `x_dir`.
    ///
    /// Directions in the XY plane produce a pure rotation about `+Z`, so
    /// planar constructions stay planar.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `x_dir` has zero length.
    pub fn aligned(position: Point3, x_dir: &Vector3) -> Result<Self> {
        let len = x_dir.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let dir = x_dir / len;
        if dir.z.abs() < TOLERANCE {
            return Ok(Self::planar(position, planar_angle(&dir)));
        }
        let rotation = Rotation::rotation_between(&Vector3::x(), &dir).unwrap_or_else(|| {
            Rotation::from_axis_angle(&Vector3::z_axis(), std::f64::consts::PI)
        });
        Ok(Self::new(position, rotation))
    }

    /// Returns the origin of the local system in world coordinates.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }

    /// Returns the rotation of the local system.
    #[must_use]
    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    /// Angle of the local `+X` axis in the world XY plane.
    #[must_use]
    pub fn angle(&self) -> f64 {
        planar_angle(&self.x_axis())
    }

    /// Local `+X` axis in world coordinates.
    #[must_use]
    pub fn x_axis(&self) -> Vector3 {
        self.rotation * Vector3::x()
    }

    /// Local `+Y` axis in world coordinates.
    #[must_use]
    pub fn y_axis(&self) -> Vector3 {
        self.rotation * Vector3::y()
    }

    /// Local `+Z` axis (the plane normal of planar curves) in world coordinates.
    #[must_use]
    pub fn z_axis(&self) -> Vector3 {
        self.rotation * Vector3::z()
    }

    /// Returns the placement as an isometry.
    #[must_use]
    pub fn isometry(&self) -> Isometry3 {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.rotation)
    }

    /// Returns the local-to-world affine matrix.
    #[must_use]
    pub fn local_matrix(&self) -> Matrix4 {
        self.isometry().to_homogeneous()
    }

    /// Maps a local point to world coordinates.
    #[must_use]
    pub fn point_to_world(&self, local: &Point3) -> Point3 {
        self.position + self.rotation * local.coords
    }

    /// Maps a local vector to world coordinates (rotation only).
    #[must_use]
    pub fn vector_to_world(&self, local: &Vector3) -> Vector3 {
        self.rotation * local
    }

    /// Maps a world point into local coordinates.
    #[must_use]
    pub fn point_to_local(&self, world: &Point3) -> Point3 {
        Point3::from(self.rotation.inverse_transform_vector(&(world - self.position)))
    }

    /// Maps a world vector into local coordinates.
    #[must_use]
    pub fn vector_to_local(&self, world: &Vector3) -> Vector3 {
        self.rotation.inverse_transform_vector(world)
    }
}

/// Handle of a frame inside a [`FrameTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

/// A transform with an optional parent frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Placement relative to the parent (or the world for roots).
    pub local: Transform,
    /// Parent frame, always created before this one.
    pub parent: Option<FrameId>,
}

/// Append-only arena of parent-chained frames.
///
/// A frame can only name a parent that already exists, so every chain is
/// acyclic and ends at a root.
#[derive(Debug, Clone, Default)]
pub struct FrameTree {
    frames: Vec<Frame>,
}

impl FrameTree {
    /// Creates an empty frame tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` does not belong to this tree.
    pub fn push(&mut self, local: Transform, parent: Option<FrameId>) -> Result<FrameId> {
        if let Some(parent) = parent {
            self.frame(parent)?;
        }
        self.frames.push(Frame { local, parent });
        Ok(FrameId(self.frames.len() - 1))
    }

    /// Returns the frame for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not in this tree.
    pub fn frame(&self, id: FrameId) -> std::result::Result<&Frame, TopologyError> {
        self.frames
            .get(id.0)
            .ok_or(TopologyError::EntityNotFound("frame"))
    }

    /// Computes the world placement of a frame: its local transform applied
    /// first, then each ancestor's.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not in this tree.
    pub fn world(&self, id: FrameId) -> Result<Isometry3> {
        let mut world = Isometry3::identity();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let frame = self.frame(current)?;
            world = frame.local.isometry() * world;
            cursor = frame.parent;
        }
        Ok(world)
    }

    /// Number of frames in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns whether the tree holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn planar_angle_round_trips() {
        let t = Transform::planar(Point3::new(1.0, 2.0, 0.0), 0.75);
        assert_relative_eq!(t.angle(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn aligned_in_plane_is_rotation_about_z() {
        let t = Transform::aligned(Point3::origin(), &Vector3::new(-1.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(t.z_axis(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(t.x_axis(), -Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn aligned_rejects_zero_direction() {
        assert!(Transform::aligned(Point3::origin(), &Vector3::zeros()).is_err());
    }

    #[test]
    fn local_world_round_trip() {
        let t = Transform::planar(Point3::new(3.0, -1.0, 2.0), FRAC_PI_4);
        let p = Point3::new(0.5, 4.0, -1.0);
        let back = t.point_to_local(&t.point_to_world(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);

        // Vectors ignore the translation.
        let v = Vector3::new(1.0, 0.0, 2.0);
        let world = t.vector_to_world(&v);
        let expected = Vector3::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 2.0);
        assert_relative_eq!(world, expected, epsilon = 1e-12);
        assert_relative_eq!(t.vector_to_local(&world), v, epsilon = 1e-12);
    }

    #[test]
    fn local_matrix_matches_point_mapping() {
        let t = Transform::planar(Point3::new(1.0, 1.0, 0.0), FRAC_PI_2);
        let p = Point3::new(2.0, 0.0, 0.0);
        let via_matrix = t.local_matrix().transform_point(&p);
        assert_relative_eq!(via_matrix, t.point_to_world(&p), epsilon = 1e-12);
        assert_relative_eq!(via_matrix, Point3::new(1.0, 3.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn world_applies_local_then_parent() {
        let mut tree = FrameTree::new();
        let root = tree
            .push(Transform::planar(Point3::new(10.0, 0.0, 0.0), FRAC_PI_2), None)
            .unwrap();
        let child = tree
            .push(Transform::planar(Point3::new(1.0, 0.0, 0.0), 0.0), Some(root))
            .unwrap();
        let world = tree.world(child).unwrap();
        let p = world.transform_point(&Point3::origin());
        assert_relative_eq!(p, Point3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn foreign_parent_is_rejected() {
        let mut other = FrameTree::new();
        other.push(Transform::identity(), None).unwrap();
        let foreign = other.push(Transform::identity(), None).unwrap();

        let mut tree = FrameTree::new();
        assert!(tree.push(Transform::identity(), Some(foreign)).is_err());
        assert!(tree.is_empty());
    }
}
