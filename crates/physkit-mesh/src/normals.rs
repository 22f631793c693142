//! Vertex normal computation for polygonal meshes.
//!
//! Computes area-weighted vertex normals by accumulating
//! face normals from each adjacent polygon.

use physkit_math::DVec3;
use physkit_types::NormalId;

use crate::mesh::SurfaceMesh;

/// Recompute vertex normals from polygon geometry (area-weighted).
///
/// Polygons are fan-triangulated from their first corner. Each triangle's
/// cross product (magnitude = 2 × area) is accumulated at every corner of
/// the polygon, then normalized.
///
/// The normal pool is replaced with one normal per position and every
/// vertex reference is re-pointed at the normal of its own position.
pub fn compute_vertex_normals(mesh: &mut SurfaceMesh) {
    let n = mesh.vertex_count();
    let mut acc = vec![DVec3::ZERO; n];

    for group in mesh.groups() {
        for face in group.faces() {
            let verts = face.vertices();
            if verts.len() < 3 {
                continue;
            }
            let a = mesh.position(verts[0].position);
            let mut face_normal = DVec3::ZERO;
            for w in verts[1..].windows(2) {
                let b = mesh.position(w[0].position);
                let c = mesh.position(w[1].position);
                face_normal += (b - a).cross(c - a);
            }
            for v in verts {
                acc[v.position.index()] += face_normal;
            }
        }
    }

    for normal in &mut acc {
        let len = normal.length();
        if len > 1e-10 {
            *normal /= len;
        }
    }

    mesh.replace_normals(acc);
    for group in mesh.groups_mut() {
        for face in group.faces_mut() {
            for v in face.vertices_mut() {
                v.normal = Some(NormalId(v.position.0));
            }
        }
    }
}
