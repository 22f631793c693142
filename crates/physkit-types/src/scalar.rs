//! Scalar type alias for the toolkit.
//!
//! Frame boundaries are checked to 1e-9, so the driver and the mesh
//! pools run in double precision.

/// The floating-point type used throughout the toolkit.
///
/// Set to `f64`. Every crate goes through this alias, so switching to
/// `f32` for a single-precision build is a one-line change.
pub type Scalar = f64;
