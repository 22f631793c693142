//! # physkit-types
//!
//! Shared types, identifiers, error types, and simulation constants
//! for the physkit simulation toolkit.
//!
//! This crate has zero domain logic: it defines the vocabulary
//! that all other physkit crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{PhysError, PhysResult};
pub use ids::{GroupId, MaterialId, NormalId, PositionId, TexCoordId};
pub use scalar::Scalar;
