//! Simulation defaults and wire-format constants.

use crate::Scalar;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Scalar = 9.81;

/// Default CFL safety factor.
pub const DEFAULT_CFL_NUMBER: Scalar = 0.5;

/// Default material sound speed used by the CFL bound.
pub const DEFAULT_SOUND_SPEED: Scalar = 0.0;

/// Default frame rate (frames per unit time).
pub const DEFAULT_FRAME_RATE: Scalar = 30.0;

/// Default hard upper bound on a substep.
pub const DEFAULT_MAX_DT: Scalar = 1.0e-3;

/// Remaining frame time below which a frame is considered complete.
pub const FRAME_TIME_EPSILON: Scalar = 1.0e-12;

/// Support cutoff (in smoothing lengths) for kernels with unbounded support.
pub const UNBOUNDED_KERNEL_CUTOFF: Scalar = 3.0;

// ─── MTL defaults ─────────────────────────────────────────────

/// Ambient reflectance of a freshly declared material.
pub const DEFAULT_KA: [Scalar; 3] = [0.1, 0.1, 0.1];

/// Diffuse reflectance of a freshly declared material.
pub const DEFAULT_KD: [Scalar; 3] = [0.5, 0.5, 0.5];

/// Specular reflectance of a freshly declared material.
pub const DEFAULT_KS: [Scalar; 3] = [0.0, 0.0, 0.0];

/// Shininess of a freshly declared material.
pub const DEFAULT_SHININESS: Scalar = 65.0;

/// Opacity of a freshly declared material.
pub const DEFAULT_ALPHA: Scalar = 1.0;

/// `Ns` on the wire equals `shininess * NS_WIRE_SCALE`.
pub const NS_WIRE_SCALE: Scalar = 1000.0 / 128.0;

/// Name of the group created for faces that precede any `g` directive.
pub const DEFAULT_GROUP_NAME: &str = "default";
