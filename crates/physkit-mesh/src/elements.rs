//! Groups, faces and vertex references.

use serde::{Deserialize, Serialize};
use physkit_types::{MaterialId, NormalId, PositionId, TexCoordId};

/// One face corner: a mandatory position plus optional texture/normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexRef {
    pub position: PositionId,
    pub texture: Option<TexCoordId>,
    pub normal: Option<NormalId>,
}

impl VertexRef {
    /// Creates a position-only reference.
    pub fn new(position: PositionId) -> Self {
        Self {
            position,
            texture: None,
            normal: None,
        }
    }

    /// Attaches a texture coordinate.
    pub fn with_texture(mut self, texture: TexCoordId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Attaches a normal.
    pub fn with_normal(mut self, normal: NormalId) -> Self {
        self.normal = Some(normal);
        self
    }

    #[inline]
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    #[inline]
    pub fn has_normal(&self) -> bool {
        self.normal.is_some()
    }
}

/// An ordered polygon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Face {
    vertices: Vec<VertexRef>,
}

impl Face {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: Vec<VertexRef>) -> Self {
        Self { vertices }
    }

    pub fn add_vertex(&mut self, vertex: VertexRef) {
        self.vertices.push(vertex);
    }

    pub fn vertices(&self) -> &[VertexRef] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [VertexRef] {
        &mut self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// A named collection of faces with an optional material.
///
/// `material == None` is the "unset" state: the group was created before
/// any material was assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    name: String,
    material: Option<MaterialId>,
    faces: Vec<Face>,
}

impl Group {
    /// Creates an empty group with no material.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_material(name, None)
    }

    /// Creates an empty group bound to `material`.
    pub fn with_material(name: impl Into<String>, material: Option<MaterialId>) -> Self {
        Self {
            name: name.into(),
            material,
            faces: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    pub fn set_material(&mut self, material: Option<MaterialId>) {
        self.material = material;
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
