//! Core surface mesh type.
//!
//! Three vertex pools are shared by every face of every group:
//! - `positions: [p0, p1, p2, ...]`
//! - `normals: [n0, n1, ...]`
//! - `texture_coordinates: [t0, t1, ...]`
//!
//! Faces only store integer ids into these pools, so a position can be
//! shared by faces that use different normals or texture coordinates.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use physkit_math::{DVec2, DVec3};
use physkit_types::{
    GroupId, MaterialId, NormalId, PhysError, PhysResult, PositionId, TexCoordId,
};

use crate::elements::Group;
use crate::material::Material;

/// A grouped polygonal surface mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    positions: Vec<DVec3>,
    normals: Vec<DVec3>,
    texture_coordinates: Vec<DVec2>,
    groups: Vec<Group>,
    materials: Vec<Material>,
}

impl SurfaceMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Vertex pools ─────────────────────────────────────────

    /// Appends a position and returns its id.
    pub fn add_position(&mut self, position: DVec3) -> PositionId {
        self.positions.push(position);
        PositionId((self.positions.len() - 1) as u32)
    }

    /// Appends a normal and returns its id.
    pub fn add_normal(&mut self, normal: DVec3) -> NormalId {
        self.normals.push(normal);
        NormalId((self.normals.len() - 1) as u32)
    }

    /// Appends a texture coordinate and returns its id.
    pub fn add_texture_coordinate(&mut self, uv: DVec2) -> TexCoordId {
        self.texture_coordinates.push(uv);
        TexCoordId((self.texture_coordinates.len() - 1) as u32)
    }

    #[inline]
    pub fn position(&self, id: PositionId) -> DVec3 {
        self.positions[id.index()]
    }

    #[inline]
    pub fn normal(&self, id: NormalId) -> DVec3 {
        self.normals[id.index()]
    }

    #[inline]
    pub fn texture_coordinate(&self, id: TexCoordId) -> DVec2 {
        self.texture_coordinates[id.index()]
    }

    /// Overwrites an existing position.
    #[inline]
    pub fn set_position(&mut self, id: PositionId, position: DVec3) {
        self.positions[id.index()] = position;
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    pub fn texture_coordinates(&self) -> &[DVec2] {
        &self.texture_coordinates
    }

    /// Replaces the whole normal pool.
    ///
    /// Existing face references are left untouched; callers are expected
    /// to re-point them (see [`crate::normals::compute_vertex_normals`]).
    pub fn replace_normals(&mut self, normals: Vec<DVec3>) {
        self.normals = normals;
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    #[inline]
    pub fn texture_coordinate_count(&self) -> usize {
        self.texture_coordinates.len()
    }

    // ─── Groups ───────────────────────────────────────────────

    /// Appends a group. Group names are unique within a mesh.
    pub fn add_group(&mut self, group: Group) -> PhysResult<GroupId> {
        if self.group_id(group.name()).is_some() {
            return Err(PhysError::InvalidMesh(format!(
                "Group '{}' already exists",
                group.name()
            )));
        }
        self.groups.push(group);
        Ok(GroupId((self.groups.len() - 1) as u32))
    }

    /// Looks up a group id by name.
    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.name() == name)
            .map(|i| GroupId(i as u32))
    }

    #[inline]
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.index()]
    }

    #[inline]
    pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.index()]
    }

    /// Removes a group. Ids of later groups shift down by one.
    pub fn remove_group(&mut self, id: GroupId) -> Group {
        self.groups.remove(id.index())
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn group_by_name_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.name() == name)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [Group] {
        &mut self.groups
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of faces across all groups.
    pub fn face_count(&self) -> usize {
        self.groups.iter().map(Group::face_count).sum()
    }

    // ─── Materials ────────────────────────────────────────────

    /// Appends a material and returns its id.
    ///
    /// Names are not checked for uniqueness; [`Self::material_index`]
    /// returns the first match.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId((self.materials.len() - 1) as u32)
    }

    /// Returns the id of the first material named `name`.
    pub fn material_index(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|m| m.name == name)
            .map(|i| MaterialId(i as u32))
    }

    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    #[inline]
    pub fn material_mut(&mut self, id: MaterialId) -> &mut Material {
        &mut self.materials[id.index()]
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    #[inline]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    // ─── Queries ──────────────────────────────────────────────

    /// Axis-aligned bounding box of the position pool, `None` when empty.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - Group names are unique
    /// - Group materials reference existing entries
    /// - Every face has at least one vertex
    /// - Every vertex reference is within its pool
    pub fn validate(&self) -> PhysResult<()> {
        let mut names = HashSet::with_capacity(self.groups.len());
        for group in &self.groups {
            if !names.insert(group.name()) {
                return Err(PhysError::InvalidMesh(format!(
                    "Duplicate group name '{}'",
                    group.name()
                )));
            }

            if let Some(mat) = group.material() {
                if mat.index() >= self.materials.len() {
                    return Err(PhysError::InvalidMesh(format!(
                        "Group '{}' references material {} (material count: {})",
                        group.name(),
                        mat.index(),
                        self.materials.len()
                    )));
                }
            }

            for (f, face) in group.faces().iter().enumerate() {
                if face.vertex_count() == 0 {
                    return Err(PhysError::InvalidMesh(format!(
                        "Face {} of group '{}' has no vertices",
                        f,
                        group.name()
                    )));
                }
                for v in face.vertices() {
                    self.check_vertex_ref(group.name(), f, v)?;
                }
            }
        }
        Ok(())
    }

    fn check_vertex_ref(
        &self,
        group: &str,
        face: usize,
        v: &crate::elements::VertexRef,
    ) -> PhysResult<()> {
        let out_of_range = |what: &str, idx: usize, count: usize| {
            PhysError::InvalidMesh(format!(
                "Face {} of group '{}' references {} {} (count: {})",
                face, group, what, idx, count
            ))
        };

        if v.position.index() >= self.positions.len() {
            return Err(out_of_range("position", v.position.index(), self.positions.len()));
        }
        if let Some(t) = v.texture {
            if t.index() >= self.texture_coordinates.len() {
                return Err(out_of_range(
                    "texture coordinate",
                    t.index(),
                    self.texture_coordinates.len(),
                ));
            }
        }
        if let Some(n) = v.normal {
            if n.index() >= self.normals.len() {
                return Err(out_of_range("normal", n.index(), self.normals.len()));
            }
        }
        Ok(())
    }
}
