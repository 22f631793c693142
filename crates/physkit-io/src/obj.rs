//! File-level OBJ load/save.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use physkit_mesh::SurfaceMesh;
use physkit_types::PhysResult;

use crate::mtl::MtlIo;
use crate::obj_reader::read_obj;
use crate::obj_writer::write_obj;
use crate::paths;

const OBJ_SUFFIX: &str = ".obj";

/// Loads and saves [`SurfaceMesh`]es as Wavefront OBJ files.
///
/// The file name must carry the `.obj` suffix, matched from the first
/// `.` of the file name onward.
pub struct ObjMeshIo;

impl ObjMeshIo {
    /// Reads `path` and any material library it references.
    pub fn load<P: AsRef<Path>>(path: P) -> PhysResult<SurfaceMesh> {
        let path_str = path.as_ref().to_string_lossy();
        paths::split_suffix(&path_str, OBJ_SUFFIX)?;

        let file = File::open(path.as_ref())?;
        let mesh = read_obj(BufReader::new(file), paths::dir_name(&path_str))?;
        tracing::debug!(
            path = %path_str,
            vertices = mesh.vertex_count(),
            normals = mesh.normal_count(),
            texcoords = mesh.texture_coordinate_count(),
            groups = mesh.group_count(),
            faces = mesh.face_count(),
            materials = mesh.material_count(),
            "loaded OBJ mesh"
        );
        Ok(mesh)
    }

    /// Writes `mesh` to `path` and its materials to the sibling `.mtl` file.
    ///
    /// For `dir/name.obj` the library is `dir/name.mtl`; both files are
    /// truncated.
    pub fn save<P: AsRef<Path>>(path: P, mesh: &SurfaceMesh) -> PhysResult<()> {
        let path_str = path.as_ref().to_string_lossy();
        let prefix = paths::split_suffix(&path_str, OBJ_SUFFIX)?;

        let mut out = BufWriter::new(File::create(path.as_ref())?);
        MtlIo::save(format!("{prefix}.mtl"), mesh)?;
        let mtl_file = format!("{}.mtl", paths::file_name_in_path(prefix));
        write_obj(&mut out, mesh, &mtl_file)?;
        out.flush()?;

        tracing::debug!(path = %path_str, groups = mesh.group_count(), "saved OBJ mesh");
        Ok(())
    }
}
