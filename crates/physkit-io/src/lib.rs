//! # physkit-io
//!
//! Wavefront OBJ and MTL codecs for [`physkit_mesh::SurfaceMesh`].
//!
//! - [`ObjMeshIo`]: file-level `load`/`save` with suffix checks and the
//!   companion `.mtl` library.
//! - [`obj_reader`] / [`obj_writer`]: stream-level codecs, usable on any
//!   `BufRead`/`Write`.
//! - [`mtl`]: material library reader and writer.
//! - [`paths`]: textual path helpers; joins are plain `dir + "/" + name`
//!   so written files round-trip byte for byte.

pub mod mtl;
pub mod obj;
pub mod obj_reader;
pub mod obj_writer;
pub mod paths;

pub use mtl::MtlIo;
pub use obj::ObjMeshIo;
