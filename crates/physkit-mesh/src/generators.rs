//! Procedural mesh generators for demos and testing.
//!
//! These generators produce deterministic, resolution-configurable meshes
//! with counter-clockwise winding and texture coordinates.

use physkit_math::{DVec2, DVec3};
use physkit_types::{PositionId, Scalar, TexCoordId};

use crate::elements::{Face, Group, VertexRef};
use crate::mesh::SurfaceMesh;
use physkit_types::constants::DEFAULT_GROUP_NAME;

/// Generates a flat rectangular quad grid in the XY plane.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y,
/// centered at the origin at Z=0. Every position gets its own texture
/// coordinate (same index) and all corners share a single `+Z` normal.
/// Faces are quads in the `"default"` group.
///
/// # Arguments
/// - `cols`: Number of quads along X (vertex count = cols + 1).
/// - `rows`: Number of quads along Y (vertex count = rows + 1).
/// - `width`: Total width.
/// - `height`: Total height.
///
/// # Example
/// ```
/// use physkit_mesh::generators::quad_grid;
/// let mesh = quad_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);  // 3×3 vertices
/// assert_eq!(mesh.face_count(), 4);    // 2×2 quads
/// ```
pub fn quad_grid(cols: usize, rows: usize, width: Scalar, height: Scalar) -> SurfaceMesh {
    let verts_x = cols + 1;
    let verts_y = rows + 1;

    let mut mesh = SurfaceMesh::new();
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    for j in 0..verts_y {
        for i in 0..verts_x {
            let u = i as Scalar / cols.max(1) as Scalar;
            let v = j as Scalar / rows.max(1) as Scalar;
            mesh.add_position(DVec3::new(-half_w + u * width, -half_h + v * height, 0.0));
            mesh.add_texture_coordinate(DVec2::new(u, v));
        }
    }
    let up = mesh.add_normal(DVec3::Z);

    let mut group = Group::new(DEFAULT_GROUP_NAME);
    let corner = |k: usize| {
        VertexRef::new(PositionId(k as u32))
            .with_texture(TexCoordId(k as u32))
            .with_normal(up)
    };
    for j in 0..rows {
        for i in 0..cols {
            let bot_left = j * verts_x + i;
            let bot_right = bot_left + 1;
            let top_left = bot_left + verts_x;
            let top_right = top_left + 1;
            group.add_face(Face::from_vertices(vec![
                corner(bot_left),
                corner(bot_right),
                corner(top_right),
                corner(top_left),
            ]));
        }
    }

    // A fresh mesh has no groups, so the name cannot collide.
    let _ = mesh.add_group(group);
    mesh
}

/// Generates the axis-aligned unit cube `[0, 1]³` as six outward-facing quads.
///
/// Positions only; the single group is named `"cube"`.
pub fn unit_cube() -> SurfaceMesh {
    let mut mesh = SurfaceMesh::new();
    for k in 0..8u32 {
        let x = (k & 1) as Scalar;
        let y = ((k >> 1) & 1) as Scalar;
        let z = ((k >> 2) & 1) as Scalar;
        mesh.add_position(DVec3::new(x, y, z));
    }

    const QUADS: [[u32; 4]; 6] = [
        [0, 2, 3, 1], // -Z
        [4, 5, 7, 6], // +Z
        [0, 1, 5, 4], // -Y
        [2, 6, 7, 3], // +Y
        [0, 4, 6, 2], // -X
        [1, 3, 7, 5], // +X
    ];

    let mut group = Group::new("cube");
    for quad in QUADS {
        group.add_face(Face::from_vertices(
            quad.iter().map(|&p| VertexRef::new(PositionId(p))).collect(),
        ));
    }
    let _ = mesh.add_group(group);
    mesh
}
