//! OBJ serializer.

use std::io::Write;

use physkit_mesh::{SurfaceMesh, VertexRef};
use physkit_types::PhysResult;

/// Writes `mesh` in OBJ form, referencing the material library `mtl_file`.
///
/// Layout: `mtllib`, all `v`, all `vn`, all `vt`, then per group an
/// optional `usemtl` (omitted for groups without a material), `g` and its
/// faces. Pool indices are written 1-based.
pub fn write_obj<W: Write>(out: &mut W, mesh: &SurfaceMesh, mtl_file: &str) -> PhysResult<()> {
    writeln!(out, "mtllib {mtl_file}")?;

    for p in mesh.positions() {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in mesh.normals() {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for t in mesh.texture_coordinates() {
        writeln!(out, "vt {} {}", t.x, t.y)?;
    }

    for group in mesh.groups() {
        if let Some(material) = group.material() {
            writeln!(out, "usemtl {}", mesh.material(material).name)?;
        }
        writeln!(out, "g {}", group.name())?;
        for face in group.faces() {
            write!(out, "f ")?;
            let mut needs_separator = false;
            for vertex in face.vertices() {
                if needs_separator {
                    write!(out, " ")?;
                }
                write_vertex_ref(out, vertex)?;
                // A reference with a normal already ends in a space.
                needs_separator = !vertex.has_normal();
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_vertex_ref<W: Write>(out: &mut W, v: &VertexRef) -> PhysResult<()> {
    write!(out, "{}", v.position.0 + 1)?;
    if v.has_texture() || v.has_normal() {
        write!(out, "/")?;
    }
    if let Some(t) = v.texture {
        write!(out, "{}", t.0 + 1)?;
    }
    if let Some(n) = v.normal {
        write!(out, "/{} ", n.0 + 1)?;
    }
    Ok(())
}
