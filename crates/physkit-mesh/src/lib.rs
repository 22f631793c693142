//! # physkit-mesh
//!
//! Polygonal surface mesh with three append-only vertex pools
//! (positions, normals, texture coordinates), named face groups and
//! a material list.
//!
//! ## Key Types
//!
//! - [`SurfaceMesh`]: Owns the pools, groups and materials.
//! - [`Group`]: A named run of faces sharing one material.
//! - [`Face`] / [`VertexRef`]: Polygons whose corners index into the pools.
//! - [`Material`]: Phong-style material as stored in `.mtl` files.
//!
//! All cross references are integer ids, so pools can grow without
//! invalidating anything.

pub mod elements;
pub mod generators;
pub mod material;
pub mod mesh;
pub mod normals;

pub use elements::{Face, Group, VertexRef};
pub use material::Material;
pub use mesh::SurfaceMesh;
